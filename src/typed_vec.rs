/// Declares an index newtype and a vector that can only be indexed by it.
///
/// The arrangement is a cyclic graph, so its nodes live in a flat arena and
/// refer to one another by index. Giving each arena its own index type keeps
/// node indices from being used to look up rings, and vice versa.
macro_rules! typed_vec {
    ($(#[$vec_meta:meta])* $vec_name:ident, $(#[$idx_meta:meta])* $idx_name:ident, $dbg_prefix:expr) => {
        $(#[$idx_meta])*
        #[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
        pub struct $idx_name(pub usize);

        $(#[$vec_meta])*
        #[derive(Clone, PartialEq)]
        pub struct $vec_name<T> {
            inner: Vec<T>,
        }

        impl std::fmt::Debug for $idx_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}_{}", $dbg_prefix, self.0)
            }
        }

        #[allow(dead_code)]
        impl<T> $vec_name<T> {
            /// Wraps a plain vector.
            pub fn from_vec(vec: Vec<T>) -> Self {
                Self { inner: vec }
            }

            /// Returns an iterator over all indices into this vector.
            pub fn indices(&self) -> impl Iterator<Item = $idx_name> {
                (0..self.inner.len()).map($idx_name)
            }

            /// The length of this vector.
            pub fn len(&self) -> usize {
                self.inner.len()
            }

            /// Are we empty?
            pub fn is_empty(&self) -> bool {
                self.inner.is_empty()
            }

            /// Adds a new element, returning its index.
            pub fn push(&mut self, elt: T) -> $idx_name {
                self.inner.push(elt);
                $idx_name(self.inner.len() - 1)
            }

            /// Returns an iterator over indices and elements.
            pub fn iter(&self) -> impl Iterator<Item = ($idx_name, &T)> + '_ {
                self.inner
                    .iter()
                    .enumerate()
                    .map(|(idx, t)| ($idx_name(idx), t))
            }
        }

        #[allow(dead_code)]
        impl<T: Default> $vec_name<T> {
            /// Creates a new vector with `size` elements, each initialized with
            /// its own default value.
            ///
            /// Every slot is a separate allocation, so growing one of them never
            /// shows up in another.
            pub fn with_size(size: usize) -> Self {
                Self {
                    inner: std::iter::repeat_with(T::default).take(size).collect(),
                }
            }
        }

        impl<T> Default for $vec_name<T> {
            fn default() -> Self {
                Self { inner: Vec::new() }
            }
        }

        impl<T> std::ops::Index<$idx_name> for $vec_name<T> {
            type Output = T;

            fn index(&self, index: $idx_name) -> &Self::Output {
                &self.inner[index.0]
            }
        }

        impl<T> std::ops::IndexMut<$idx_name> for $vec_name<T> {
            fn index_mut(&mut self, index: $idx_name) -> &mut T {
                &mut self.inner[index.0]
            }
        }

        impl<T: std::fmt::Debug> std::fmt::Debug for $vec_name<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_map().entries(self.iter()).finish()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    typed_vec!(
        /// Per-ring scratch space.
        ScratchVec,
        /// An index into [`ScratchVec`].
        ScratchIdx,
        "r"
    );

    #[test]
    fn with_size_allocates_each_slot() {
        let mut scratch: ScratchVec<Vec<usize>> = ScratchVec::with_size(3);
        scratch[ScratchIdx(1)].push(7);
        scratch[ScratchIdx(1)].push(8);

        assert!(scratch[ScratchIdx(0)].is_empty());
        assert_eq!(scratch[ScratchIdx(1)], vec![7, 8]);
        assert!(scratch[ScratchIdx(2)].is_empty());
    }

    #[test]
    fn push_returns_index() {
        let mut scratch = ScratchVec::default();
        assert_eq!(scratch.push("a"), ScratchIdx(0));
        assert_eq!(scratch.push("b"), ScratchIdx(1));
        assert_eq!(scratch.indices().collect::<Vec<_>>(), [ScratchIdx(0), ScratchIdx(1)]);
        assert_eq!(format!("{:?}", ScratchIdx(1)), "r_1");
    }
}
