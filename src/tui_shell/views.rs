pub(super) mod cluster_list;
pub(super) mod main_menu;
