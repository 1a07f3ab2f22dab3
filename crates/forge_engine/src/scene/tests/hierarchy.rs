//! Hierarchy scenarios on a fourteen-object reference tree
//!
//! 0 -> {1, 2}, 1 -> {3, 4}, 2 -> {5, 6}, 3 -> {7, 8, 9}, 4 -> {10},
//! 5 -> {11, 12}, 6 -> {13}; objects 2, 4 and 8 start inactive. Object 0
//! hangs under the scene root.

use crate::core::config::SceneConfig;
use crate::graph::GraphError;
use crate::registry::{InstanceId, Registry};
use crate::scene::{GameObject, SceneError, SceneGraph};

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "__root_node__";

    fn fixture() -> (SceneGraph, Vec<InstanceId>) {
        let registry = Registry::new();
        let mut sg = SceneGraph::new(registry.clone(), &SceneConfig::default()).unwrap();
        let parents = [
            None, Some(0), Some(0), Some(1), Some(1), Some(2), Some(2),
            Some(3), Some(3), Some(3), Some(4), Some(5), Some(5), Some(6),
        ];

        let mut ids: Vec<InstanceId> = Vec::new();
        for (i, parent) in parents.iter().enumerate() {
            let mut object = GameObject::new(&registry, i.to_string());
            if matches!(i, 2 | 4 | 8) {
                object.set_active(false);
            }
            let id = sg.add_object(object, parent.map(|p| ids[p])).unwrap();
            ids.push(id);
        }
        (sg, ids)
    }

    fn labels(sg: &SceneGraph, ids: &[InstanceId]) -> Vec<String> {
        ids.iter()
            .map(|&id| sg.with_object(id, |o| o.name().to_string()).unwrap())
            .collect()
    }

    fn assert_cache_coherent(sg: &SceneGraph) {
        let mut expected = vec![sg.root()];
        expected.extend(sg.descendants(sg.root(), false));
        assert_eq!(sg.objects(), expected.as_slice());

        let component_total: usize = sg
            .objects()
            .iter()
            .map(|&id| sg.with_object(id, |o| o.component_count()).unwrap())
            .sum();
        assert_eq!(sg.components().len(), component_total);
        assert_eq!(sg.descriptors().len(), sg.objects().len());
    }

    #[test]
    fn test_cache_holds_pruned_preorder() {
        let (sg, _) = fixture();

        assert_eq!(labels(&sg, sg.objects()), vec![ROOT, "0", "1", "3", "7", "9"]);
        assert_cache_coherent(&sg);
    }

    #[test]
    fn test_descendants_with_and_without_inactive() {
        let (sg, ids) = fixture();

        assert_eq!(
            labels(&sg, &sg.descendants(ids[0], true)),
            vec!["1", "3", "7", "8", "9", "4", "10", "2", "5", "11", "12", "6", "13"]
        );
        assert_eq!(labels(&sg, &sg.descendants(ids[0], false)), vec!["1", "3", "7", "9"]);
        assert!(sg.descendants(ids[2], false).is_empty());
        assert_eq!(labels(&sg, &sg.descendants(ids[2], true)), vec!["5", "11", "12", "6", "13"]);
    }

    #[test]
    fn test_move_subtree_under_active_branch() {
        let (mut sg, ids) = fixture();

        sg.move_object(ids[5], ids[9]).unwrap();

        assert_eq!(labels(&sg, &sg.descendants(ids[9], true)), vec!["5", "11", "12"]);
        assert_eq!(labels(&sg, &sg.descendants(ids[9], false)), vec!["5", "11", "12"]);
        assert_eq!(
            labels(&sg, sg.objects()),
            vec![ROOT, "0", "1", "3", "7", "9", "5", "11", "12"]
        );
        assert_eq!(sg.with_object(ids[2], |o| o.children().to_vec()).unwrap(), vec![ids[6]]);
        assert_cache_coherent(&sg);
    }

    #[test]
    fn test_move_into_descendant_is_rejected_without_change() {
        let (mut sg, ids) = fixture();
        let before = sg.descendants(ids[0], true);

        let result = sg.move_object(ids[2], ids[13]);

        assert!(matches!(result, Err(SceneError::Graph(GraphError::Descendant { .. }))));
        assert_eq!(sg.descendants(ids[0], true), before);
        assert!(matches!(
            sg.move_object(ids[3], ids[3]),
            Err(SceneError::Graph(GraphError::Descendant { .. }))
        ));
    }

    #[test]
    fn test_move_under_current_parent_is_noop() {
        let (mut sg, ids) = fixture();
        let revision = sg.revision();

        sg.move_object(ids[7], ids[3]).unwrap();

        assert_eq!(sg.revision(), revision);
        assert_eq!(labels(&sg, &sg.descendants(ids[3], true)), vec!["7", "8", "9"]);
    }

    #[test]
    fn test_remove_branch_takes_inactive_descendants() {
        let (mut sg, ids) = fixture();
        let registry = sg.registry().clone();

        let removed = sg.remove_object(ids[1]).unwrap();

        assert_eq!(removed, 7);
        assert_eq!(
            labels(&sg, &sg.descendants(ids[0], true)),
            vec!["2", "5", "11", "12", "6", "13"]
        );
        for gone in [1, 3, 4, 7, 8, 9, 10] {
            assert!(!sg.contains(ids[gone]));
            assert!(!registry.is_live(ids[gone]));
        }
        assert_eq!(labels(&sg, sg.objects()), vec![ROOT, "0"]);
        assert_cache_coherent(&sg);
    }

    #[test]
    fn test_remove_top_object_leaves_only_root() {
        let (mut sg, ids) = fixture();

        assert_eq!(sg.remove_object(ids[0]).unwrap(), 14);
        assert!(sg.has_only_root());
        assert_eq!(sg.len(), 1);
        assert_eq!(sg.objects(), &[sg.root()]);
    }

    #[test]
    fn test_reactivation_restores_subtree() {
        let (mut sg, ids) = fixture();

        sg.set_active(ids[2], true).unwrap();
        sg.refresh();

        assert_eq!(
            labels(&sg, sg.objects()),
            vec![ROOT, "0", "1", "3", "7", "9", "2", "5", "11", "12", "6", "13"]
        );
        assert!(sg.is_active_in_hierarchy(ids[13]));
        assert!(!sg.is_active_in_hierarchy(ids[10]));
        assert_cache_coherent(&sg);
    }

    #[test]
    fn test_deactivating_root_empties_cache() {
        let (mut sg, _) = fixture();
        let root = sg.root();

        sg.set_active(root, false).unwrap();
        sg.refresh();

        assert!(sg.objects().is_empty());
        assert!(sg.components().is_empty());
    }

    #[test]
    fn test_ancestors_reach_root() {
        let (sg, ids) = fixture();

        assert_eq!(labels(&sg, &sg.ancestors(ids[11]).unwrap()), vec!["5", "2", "0", ROOT]);
        assert!(sg.ancestors(sg.root()).unwrap().is_empty());
    }
}
