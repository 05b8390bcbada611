//! Deep merge of nested value trees.
//!
//! The merge is override-biased: for every key of the override, nested
//! mappings present on both sides are merged recursively and anything else
//! (scalars, sequences, null, or a type mismatch) is replaced outright.
//! Keys found only in the base survive unchanged and keep their position.

/// A tree of nested key-value mappings.
///
/// Implemented for `serde_yaml::Value` and `serde_json::Value` so the merge
/// is not tied to one document format.
pub trait NestedTree: Clone {
    /// Mapping key type.
    type Key: Clone;

    /// Returns the entries of this node if it is a mapping.
    fn entries(&self) -> Option<Vec<(Self::Key, &Self)>>;

    /// Returns the child stored under `key`, if this node is a mapping.
    fn child(&self, key: &Self::Key) -> Option<&Self>;

    /// Returns the child stored under `key` mutably.
    fn child_mut(&mut self, key: &Self::Key) -> Option<&mut Self>;

    /// Stores `value` under `key`, keeping the key's position if it exists.
    fn set_child(&mut self, key: Self::Key, value: Self);

    /// Returns true if this node is a mapping.
    fn is_branch(&self) -> bool;
}

/// Merges `overlay` on top of `base`, returning a new tree.
///
/// Neither input is modified.
#[must_use]
pub fn merge<T: NestedTree>(base: &T, overlay: &T) -> T {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay);
    merged
}

/// Merges `overlay` into `target` in place.
pub fn merge_into<T: NestedTree>(target: &mut T, overlay: &T) {
    let Some(entries) = overlay.entries() else {
        *target = overlay.clone();
        return;
    };

    if !target.is_branch() {
        *target = overlay.clone();
        return;
    }

    for (key, value) in entries {
        let recurse = value.is_branch() && target.child(&key).is_some_and(T::is_branch);

        if recurse {
            if let Some(existing) = target.child_mut(&key) {
                merge_into(existing, value);
            }
        } else {
            target.set_child(key, value.clone());
        }
    }
}

impl NestedTree for serde_yaml::Value {
    type Key = Self;

    fn entries(&self) -> Option<Vec<(Self::Key, &Self)>> {
        self.as_mapping()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v)).collect())
    }

    fn child(&self, key: &Self::Key) -> Option<&Self> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    fn child_mut(&mut self, key: &Self::Key) -> Option<&mut Self> {
        self.as_mapping_mut().and_then(|m| m.get_mut(key))
    }

    fn set_child(&mut self, key: Self::Key, value: Self) {
        if let Some(m) = self.as_mapping_mut() {
            m.insert(key, value);
        }
    }

    fn is_branch(&self) -> bool {
        self.is_mapping()
    }
}

impl NestedTree for serde_json::Value {
    type Key = String;

    fn entries(&self) -> Option<Vec<(Self::Key, &Self)>> {
        self.as_object()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v)).collect())
    }

    fn child(&self, key: &Self::Key) -> Option<&Self> {
        self.as_object().and_then(|m| m.get(key))
    }

    fn child_mut(&mut self, key: &Self::Key) -> Option<&mut Self> {
        self.as_object_mut().and_then(|m| m.get_mut(key))
    }

    fn set_child(&mut self, key: Self::Key, value: Self) {
        if let Some(m) = self.as_object_mut() {
            m.insert(key, value);
        }
    }

    fn is_branch(&self) -> bool {
        self.is_object()
    }
}
