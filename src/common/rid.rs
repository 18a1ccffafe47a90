use crate::common::config::{PageId, SlotNum, INVALID_PAGE_ID};
use bincode::{Decode, Encode};
use std::fmt;

/// Storage location of a tuple (page + slot).
///
/// Produced by scans and carried on tuples for the storage layer; operators
/// above the scan never interpret it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Hash, Ord, Encode, Decode)]
pub struct RID {
    page_id: PageId,
    slot_num: SlotNum,
}

impl RID {
    /// Creates a new RID with the given page ID and slot number.
    pub fn new(page_id: PageId, slot_num: SlotNum) -> Self {
        Self { page_id, slot_num }
    }

    pub fn get_page_id(&self) -> PageId {
        self.page_id
    }

    pub fn get_slot_num(&self) -> SlotNum {
        self.slot_num
    }
}

impl fmt::Display for RID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page_id: {} slot_num: {}", self.page_id, self.slot_num)
    }
}

impl Default for RID {
    fn default() -> Self {
        Self {
            page_id: INVALID_PAGE_ID,
            slot_num: 0,
        }
    }
}
