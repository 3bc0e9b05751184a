//! Whether a feature's phone tags deserve a fix, and how to describe it.

use crate::aggregate::PhoneTags;
use phonefix_types::diagnostics::FormattingChange;

impl PhoneTags {
    /// More candidates were extracted than ended up in buckets or rejection sets.
    pub fn has_duplicates(&self) -> bool {
        let kept: usize = self.buckets().iter().map(|b| b.values.len()).sum();
        self.candidate_count() > kept + self.diagnostics().rejected_count()
    }

    pub fn has_premium_number(&self) -> bool {
        !self.diagnostics().premium_values.is_empty()
    }

    pub fn has_wrong_separator(&self) -> bool {
        !self.diagnostics().bad_separator_keys.is_empty()
    }

    pub fn is_fixable(&self) -> bool {
        let d = self.diagnostics();
        self.has_duplicates()
            || self.has_premium_number()
            || self.has_wrong_separator()
            || d.is_beautifyable()
            || d.switched_class
            || d.switched_scheme
    }

    /// Fixable, and the fix keeps at least one number.
    pub fn offers_fix(&self) -> bool {
        self.accepted_count() > 0 && self.is_fixable()
    }

    /// Human-readable reasons for the fix, in a fixed order.
    pub fn describe(&self) -> Vec<String> {
        let d = self.diagnostics();
        let mut out = Vec::new();

        if self.has_duplicates() {
            out.push("duplicate values".to_string());
        }
        match d.premium_values.len() {
            0 => {}
            1 => out.push("premium rate number".to_string()),
            _ => out.push("premium rate numbers".to_string()),
        }
        match d.formatting {
            FormattingChange::None => {}
            FormattingChange::Beautified => out.push("beautifiable value".to_string()),
            FormattingChange::Reformatted => out.push("not in E.123 format".to_string()),
        }
        if d.switched_class {
            out.push("inappropriate key".to_string());
        }
        if d.switched_scheme {
            out.push("contact: prefix scheme recommended".to_string());
        }

        out
    }
}
