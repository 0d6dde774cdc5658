//! Hash containers with a fixed seed.
//!
//! Property lists and caches in this crate never depend on iteration order of
//! these maps, but a fixed seed keeps debug output stable between runs.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

/// The seed shared by every [`FixedHashState`].
const FIXED_SEED: FixedState = FixedState::with_seed(0x6A09_E667_F3BC_C908);

/// A [`BuildHasher`] producing [`foldhash`] hashers with a fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::{BuildHasher, Hash, Hasher};
/// use vc_introspect::hash::FixedHashState;
///
/// let mut a = FixedHashState.build_hasher();
/// let mut b = FixedHashState.build_hasher();
/// "name".hash(&mut a);
/// "name".hash(&mut b);
/// assert_eq!(a.finish(), b.finish());
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_SEED.build_hasher()
    }
}

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

pub use foldhash;
pub use hashbrown;
