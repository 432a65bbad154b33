//! Persistent AVL tree used as the store's versioned map
//!
//! Every update copies the path from the root to the touched node and shares
//! all other subtrees with the previous version, so old roots stay valid and
//! unchanged for readers holding them.

use std::cmp::Ordering;
use std::sync::Arc;

type Link<K, V> = Option<Arc<Node<K, V>>>;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    height: usize,
    left: Link<K, V>,
    right: Link<K, V>,
}

/// An immutable ordered map ordered by a caller-supplied comparator
#[derive(Debug)]
pub(crate) struct VersioningTree<K, V> {
    root: Link<K, V>,
}

impl<K, V> Clone for VersioningTree<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<K, V> Default for VersioningTree<K, V> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<K: Clone, V: Clone> VersioningTree<K, V> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn len(&self) -> usize {
        fn count<K, V>(link: &Link<K, V>) -> usize {
            link.as_ref()
                .map_or(0, |n| 1 + count(&n.left) + count(&n.right))
        }
        count(&self.root)
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        height(&self.root)
    }

    pub(crate) fn get<F>(&self, key: &K, cmp: F) -> Option<&V>
    where
        F: Fn(&K, &K) -> Ordering,
    {
        let mut current = self.root.as_ref();
        while let Some(node) = current {
            current = match cmp(key, &node.key) {
                Ordering::Less => node.left.as_ref(),
                Ordering::Greater => node.right.as_ref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    /// Return a new version with `key` bound to `value`
    pub(crate) fn insert<F>(&self, key: K, value: V, cmp: F) -> Self
    where
        F: Fn(&K, &K) -> Ordering,
    {
        Self {
            root: Some(insert(&self.root, key, value, &cmp)),
        }
    }

    /// Return a new version without `key`
    pub(crate) fn remove<F>(&self, key: &K, cmp: F) -> Self
    where
        F: Fn(&K, &K) -> Ordering,
    {
        Self {
            root: remove(&self.root, key, &cmp),
        }
    }

    /// Visit entries in key order
    pub(crate) fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        fn walk<K, V>(link: &Link<K, V>, f: &mut impl FnMut(&K, &V)) {
            if let Some(node) = link {
                walk(&node.left, f);
                f(&node.key, &node.value);
                walk(&node.right, f);
            }
        }
        walk(&self.root, &mut f);
    }
}

fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

fn make<K, V>(key: K, value: V, left: Link<K, V>, right: Link<K, V>) -> Arc<Node<K, V>> {
    let height = 1 + height(&left).max(height(&right));
    Arc::new(Node {
        key,
        value,
        height,
        left,
        right,
    })
}

fn balance<K: Clone, V: Clone>(
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
) -> Arc<Node<K, V>> {
    let (hl, hr) = (height(&left), height(&right));

    if hl > hr + 1 {
        if let Some(l) = &left {
            return match (&l.left, &l.right) {
                (ll, Some(lr)) if height(ll) < lr.height => make(
                    lr.key.clone(),
                    lr.value.clone(),
                    Some(make(l.key.clone(), l.value.clone(), ll.clone(), lr.left.clone())),
                    Some(make(key, value, lr.right.clone(), right)),
                ),
                (ll, lr) => make(
                    l.key.clone(),
                    l.value.clone(),
                    ll.clone(),
                    Some(make(key, value, lr.clone(), right)),
                ),
            };
        }
    } else if hr > hl + 1 {
        if let Some(r) = &right {
            return match (&r.left, &r.right) {
                (Some(rl), rr) if height(rr) < rl.height => make(
                    rl.key.clone(),
                    rl.value.clone(),
                    Some(make(key, value, left, rl.left.clone())),
                    Some(make(r.key.clone(), r.value.clone(), rl.right.clone(), rr.clone())),
                ),
                (rl, rr) => make(
                    r.key.clone(),
                    r.value.clone(),
                    Some(make(key, value, left, rl.clone())),
                    rr.clone(),
                ),
            };
        }
    }

    make(key, value, left, right)
}

fn insert<K: Clone, V: Clone, F>(link: &Link<K, V>, key: K, value: V, cmp: &F) -> Arc<Node<K, V>>
where
    F: Fn(&K, &K) -> Ordering,
{
    match link {
        None => make(key, value, None, None),
        Some(node) => match cmp(&key, &node.key) {
            Ordering::Less => balance(
                node.key.clone(),
                node.value.clone(),
                Some(insert(&node.left, key, value, cmp)),
                node.right.clone(),
            ),
            Ordering::Greater => balance(
                node.key.clone(),
                node.value.clone(),
                node.left.clone(),
                Some(insert(&node.right, key, value, cmp)),
            ),
            Ordering::Equal => make(key, value, node.left.clone(), node.right.clone()),
        },
    }
}

fn remove<K: Clone, V: Clone, F>(link: &Link<K, V>, key: &K, cmp: &F) -> Link<K, V>
where
    F: Fn(&K, &K) -> Ordering,
{
    let node = link.as_ref()?;
    match cmp(key, &node.key) {
        Ordering::Less => Some(balance(
            node.key.clone(),
            node.value.clone(),
            remove(&node.left, key, cmp),
            node.right.clone(),
        )),
        Ordering::Greater => Some(balance(
            node.key.clone(),
            node.value.clone(),
            node.left.clone(),
            remove(&node.right, key, cmp),
        )),
        Ordering::Equal => match (&node.left, &node.right) {
            (None, right) => right.clone(),
            (left, None) => left.clone(),
            (left, Some(right)) => {
                let (key, value, rest) = remove_min(right);
                Some(balance(key, value, left.clone(), rest))
            }
        },
    }
}

fn remove_min<K: Clone, V: Clone>(node: &Arc<Node<K, V>>) -> (K, V, Link<K, V>) {
    match &node.left {
        None => (node.key.clone(), node.value.clone(), node.right.clone()),
        Some(left) => {
            let (key, value, rest) = remove_min(left);
            (
                key,
                value,
                Some(balance(
                    node.key.clone(),
                    node.value.clone(),
                    rest,
                    node.right.clone(),
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(a: &u32, b: &u32) -> Ordering {
        a.cmp(b)
    }

    fn keys(tree: &VersioningTree<u32, &'static str>) -> Vec<u32> {
        let mut out = Vec::new();
        tree.for_each(|k, _| out.push(*k));
        out
    }

    #[test]
    fn test_insert_and_get() {
        let tree = VersioningTree::new()
            .insert(5, "five", cmp)
            .insert(1, "one", cmp)
            .insert(9, "nine", cmp);

        assert_eq!(tree.get(&1, cmp), Some(&"one"));
        assert_eq!(tree.get(&9, cmp), Some(&"nine"));
        assert_eq!(tree.get(&4, cmp), None);
        assert_eq!(keys(&tree), vec![1, 5, 9]);
    }

    #[test]
    fn test_old_versions_are_untouched() {
        let v1 = VersioningTree::new().insert(1, "one", cmp);
        let v2 = v1.insert(2, "two", cmp).insert(1, "uno", cmp);
        let v3 = v2.remove(&1, cmp);

        assert_eq!(v1.get(&1, cmp), Some(&"one"));
        assert_eq!(v1.get(&2, cmp), None);
        assert_eq!(v2.get(&1, cmp), Some(&"uno"));
        assert_eq!(v3.get(&1, cmp), None);
        assert_eq!(v3.len(), 1);
    }

    #[test]
    fn test_stays_balanced() {
        let mut tree = VersioningTree::new();
        for i in 0..1024u32 {
            tree = tree.insert(i, "x", cmp);
        }
        assert_eq!(tree.len(), 1024);
        // AVL height bound: 1.44 * log2(n + 2)
        assert!(tree.height() <= 15, "height was {}", tree.height());

        for i in (0..1024u32).step_by(2) {
            tree = tree.remove(&i, cmp);
        }
        assert_eq!(tree.len(), 512);
        assert!(tree.height() <= 14);
        assert!(keys(&tree).iter().all(|k| k % 2 == 1));
    }

    #[test]
    fn test_remove_missing_key() {
        let tree = VersioningTree::new().insert(3, "three", cmp);
        let same = tree.remove(&7, cmp);
        assert_eq!(same.len(), 1);

        let empty = same.remove(&3, cmp);
        assert!(empty.is_empty());
    }
}
