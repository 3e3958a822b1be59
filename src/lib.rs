//! Singly linked list backed by an index-based node pool.
//!
//! [`SList`] keeps a `head` link, a `tail` link and its length, which gives
//! O(1) insertion at both ends and O(1) `len()`. Nodes are stored in one
//! contiguous pool per list and refer to each other by index; removed nodes
//! are dropped immediately and their slots reused by later insertions.
//!
//! | Operation            | `SList`      | `Vec`              |
//! |----------------------|--------------|--------------------|
//! | Access by position   | O(n)         | O(1)               |
//! | Search               | O(n)         | O(n)               |
//! | Insert / remove head | O(1)         | O(n)               |
//! | Insert at tail       | O(1)         | O(1) amortized     |
//! | Remove at tail       | O(n)         | O(1)               |
//! | Remove by value      | O(n)         | O(n)               |
//!
//! Pointer-chasing lists lose to arrays on cache locality. Keeping the nodes
//! in a pool and calling [`SList::compact`] after heavy churn lays them out
//! front to back again.
//!
//! ```
//! use linked_lists::SList;
//!
//! let mut list = SList::new();
//! list.append(1);
//! list.append(2);
//! list.prepend(0);
//! assert_eq!(list.render(), "0 -> 1 -> 2");
//!
//! list.reverse();
//! assert_eq!(list.to_vec(), vec![2, 1, 0]);
//! assert!(list.delete(&1));
//! assert!(!list.search(&1));
//! ```
//!
//! The list is not synchronized; share it between threads behind a lock.

mod collection;

pub use collection::{IntoIter, Iter, IterMut, SList};
