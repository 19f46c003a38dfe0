use crate::model::{ClusterRecord, ClusterStatus};

/// Incremental search over the cluster list. The query matches against a
/// lowercase haystack of the name, status label, versions, and a
/// reachability word. The two reachability tokens must not contain each
/// other, or a search for one would also hit rows carrying the other.
#[derive(Debug, Default)]
pub(super) struct Search {
    pub(super) active: bool,
    pub(super) query: String,
}

impl Search {
    pub(super) fn reset(&mut self) {
        self.active = false;
        self.query.clear();
    }

    pub(super) fn matches(&self, record: &ClusterRecord) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        haystack(record).contains(&needle)
    }
}

fn haystack(record: &ClusterRecord) -> String {
    let reachability = match record.status {
        ClusterStatus::Online => " accessible",
        ClusterStatus::Offline | ClusterStatus::Timeout => " unreachable",
        ClusterStatus::Loading => "",
    };
    format!(
        "{} {} {} {} {}{}",
        record.name,
        record.status.label(),
        record.ocp_version,
        record.mtv_version,
        record.cnv_version,
        reachability
    )
    .to_lowercase()
}

#[cfg(test)]
mod tests {
    use crate::model::{ClusterDetail, ClusterRecord};

    use super::*;

    fn online(name: &str, mtv: &str) -> ClusterRecord {
        ClusterRecord::online(&ClusterDetail {
            name: name.to_string(),
            ocp_version: "4.17.3".to_string(),
            mtv_version: mtv.to_string(),
            cnv_version: "4.17.1".to_string(),
            bundle: String::new(),
            console_url: String::new(),
        })
    }

    #[test]
    fn empty_query_matches_everything() {
        let search = Search::default();
        assert!(search.matches(&ClusterRecord::offline("qemtv-a")));
        assert!(search.matches(&online("qemtv-b", "2.7.0")));
    }

    #[test]
    fn matches_are_case_insensitive_over_name_and_versions() {
        let mut search = Search::default();
        search.query = "QEMTV-A".to_string();
        assert!(search.matches(&online("qemtv-a", "2.7.0")));
        assert!(!search.matches(&online("qemtv-b", "2.7.0")));

        search.query = "2.7".to_string();
        assert!(search.matches(&online("qemtv-a", "2.7.0")));
    }

    #[test]
    fn reachability_words_match_status() {
        let mut search = Search::default();
        search.query = "unreachable".to_string();
        assert!(search.matches(&ClusterRecord::offline("qemtv-a")));
        assert!(search.matches(&ClusterRecord::timeout("qemtv-b")));
        assert!(!search.matches(&online("qemtv-c", "2.7.0")));

        search.query = "offline".to_string();
        assert!(search.matches(&ClusterRecord::offline("qemtv-a")));
        assert!(!search.matches(&online("qemtv-c", "2.7.0")));
    }

    #[test]
    fn accessible_never_matches_unreachable_rows() {
        let mut search = Search::default();
        search.query = "accessible".to_string();
        assert!(search.matches(&online("qemtv-c", "2.7.0")));
        assert!(!search.matches(&ClusterRecord::offline("qemtv-a")));
        assert!(!search.matches(&ClusterRecord::timeout("qemtv-b")));
    }
}
