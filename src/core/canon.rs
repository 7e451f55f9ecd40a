// src/core/canon.rs
use crate::core::sequence::SignSequence;
use crate::core::sign_table::SignTable;
use crate::core::types::{sign_char, Canonical, SignId};
use crate::error::XlitError;
use tracing::{debug, warn};

/// Raw and canonical private-use renderings of one inscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canonicalization {
    pub raw: String,
    pub canonical: String,
}

pub struct Canonicalizer<'t> {
    table: &'t SignTable,
}

impl<'t> Canonicalizer<'t> {
    pub fn new(table: &'t SignTable) -> Self {
        Self { table }
    }

    /// Walks `seq` left to right, emitting each sign's codepoint and, for the
    /// canonical string, the codepoints of its substitution targets. Targets
    /// are not looked up again.
    ///
    /// Signs missing from the table are treated as self-canonical. A sign
    /// whose canonical form is blank stops the walk with
    /// [`XlitError::UnresolvedCanonical`].
    pub fn canonize(&self, seq: &SignSequence) -> Result<Canonicalization, XlitError> {
        let mut out = Canonicalization::default();

        for &id in seq.ids() {
            let this = pua(id)?;
            out.raw.push(this);

            match self.table.get(id).map(|sign| &sign.canonical) {
                None => {
                    warn!(sign = id, "missing sign, keeping raw codepoint");
                    out.canonical.push(this);
                }
                Some(Canonical::Itself) => out.canonical.push(this),
                Some(Canonical::Substitute(targets)) => {
                    for &target in targets {
                        out.canonical.push(pua(target)?);
                    }
                }
                Some(Canonical::Unresolved) => {
                    debug!(sign = id, "unresolved canonical form");
                    return Err(XlitError::UnresolvedCanonical(id));
                }
            }
        }

        Ok(out)
    }

    /// Raw codepoints only; never consults canonical forms.
    pub fn raw(seq: &SignSequence) -> String {
        seq.ids().iter().filter_map(|&id| sign_char(id)).collect()
    }
}

fn pua(id: SignId) -> Result<char, XlitError> {
    sign_char(id).ok_or(XlitError::CodepointOutOfRange(id))
}
