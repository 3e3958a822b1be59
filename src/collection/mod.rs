mod snode;
pub(crate) use snode::{NodePool, SLink};
pub use snode::IterMut;
mod slist;
pub use slist::*;
