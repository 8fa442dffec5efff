// Mon Oct 19 2026 - Alex

use crate::extract::Reference;
use ahash::AHashSet;

/// References of `a` that are not in `b`, in the order of `a`.
pub fn diff(a: &[Reference], b: &[Reference]) -> Vec<Reference> {
    let other: AHashSet<&Reference> = b.iter().collect();
    let mut seen: AHashSet<&Reference> = AHashSet::new();
    a.iter()
        .filter(|r| !other.contains(r) && seen.insert(*r))
        .cloned()
        .collect()
}

/// References present in both `a` and `b`, in the order of `a`.
pub fn intersection(a: &[Reference], b: &[Reference]) -> Vec<Reference> {
    let other: AHashSet<&Reference> = b.iter().collect();
    let mut seen: AHashSet<&Reference> = AHashSet::new();
    a.iter()
        .filter(|r| other.contains(r) && seen.insert(*r))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeDescriptor;
    use crate::model::{Location, ReferenceKind};

    fn edge(from: &str, to: &str, kind: ReferenceKind) -> Reference {
        Reference::new(
            Location::new("c", TypeDescriptor::new("p", from)),
            Location::new("c", TypeDescriptor::new("p", to)),
            kind,
        )
    }

    #[test]
    fn test_diff_is_set_subtraction() {
        let a = vec![
            edge("B", "A", ReferenceKind::Extends),
            edge("C", "A", ReferenceKind::Extends),
            edge("C", "I", ReferenceKind::Implements),
        ];
        let b = vec![edge("C", "A", ReferenceKind::Extends).with_line(Some(4))];

        let only_a = diff(&a, &b);
        assert_eq!(only_a, vec![a[0].clone(), a[2].clone()]);
        assert!(diff(&b, &a).is_empty());
        assert!(diff(&a, &a).is_empty());
    }

    #[test]
    fn test_intersection() {
        let a = vec![edge("B", "A", ReferenceKind::Extends), edge("B", "A", ReferenceKind::Extends)];
        let b = vec![edge("B", "A", ReferenceKind::Extends)];
        assert_eq!(intersection(&a, &b).len(), 1);
        assert!(intersection(&a, &[]).is_empty());
    }
}
