//! Bookkeeping for `moved` directives. Sections asking for their items to
//! be moved are recorded as transfers; every section is recorded as an
//! account under its literal date text. Once the whole document has been
//! read the transfers are checked against the accounts.

use std::collections::HashMap;

use tracing::debug;

use super::section::{DeadlineSection, SectionId};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Transfer {
    target: String,
    source: SectionId,
}

#[derive(Debug, Default)]
pub struct MoveLedger {
    transfers: Vec<Transfer>,
    accounts: HashMap<String, SectionId>,
}

impl MoveLedger {
    pub fn new() -> MoveLedger {
        MoveLedger::default()
    }

    pub fn register_transfer(&mut self, target: &str, source: SectionId) {
        self.transfers
            .push(Transfer {
                target: target.to_string(),
                source,
            });
    }

    /// A later section with the same key replaces an earlier one.
    pub fn register_account(&mut self, key: &str, section: SectionId) {
        self.accounts
            .insert(key.to_string(), section);
    }

    pub fn account(&self, key: &str) -> Option<SectionId> {
        self.accounts
            .get(key)
            .copied()
    }

    /// For every transfer whose target exists, strip the source section of
    /// the unchecked items that made it across. Transfers to an unknown date
    /// leave the source untouched.
    pub fn validate_transfers(&self, sections: &mut [DeadlineSection]) {
        for transfer in &self.transfers {
            let target = match self.account(&transfer.target) {
                Some(target) => target,
                None => {
                    debug!(key = %transfer.target, "No section to move items into");
                    continue;
                }
            };

            if target == transfer.source {
                continue;
            }

            let moved = match sections.get(target.0) {
                Some(section) => section
                    .item_texts()
                    .clone(),
                None => continue,
            };

            if let Some(source) = sections.get_mut(transfer.source.0) {
                source.retain_unmoved(&moved);
                debug!(
                    line = source.line(),
                    remaining = source
                        .items()
                        .len(),
                    "Validated move"
                );
            }
        }
    }
}
