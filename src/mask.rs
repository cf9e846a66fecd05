//! Input masks for document, phone and postal-code fields
//!
//! A mask is a template where every `0` is a digit slot and any other
//! character is a literal. The template is picked from the number of digits
//! typed so far, so a tax id switches from CPF to CNPJ layout as soon as it
//! grows past eleven digits.

/// Placeholder for a digit slot inside a pattern
const DIGIT_SLOT: char = '0';

const CPF: MaskPattern = MaskPattern::new("000.000.000-00");
const CNPJ: MaskPattern = MaskPattern::new("00.000.000/0000-00");
const LANDLINE: MaskPattern = MaskPattern::new("(00) 0000-0000");
const MOBILE: MaskPattern = MaskPattern::new("(00) 00000-0000");
const CEP: MaskPattern = MaskPattern::new("00000-000");

/// Field categories that carry a mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    /// CPF or CNPJ
    TaxId,
    /// Landline or mobile phone with area code
    Phone,
    /// Brazilian postal code (CEP)
    PostalCode,
}

impl MaskKind {
    /// Largest number of digits any pattern of this kind accepts
    pub fn max_digits(self) -> usize {
        match self {
            Self::TaxId => CNPJ.slots(),
            Self::Phone => MOBILE.slots(),
            Self::PostalCode => CEP.slots(),
        }
    }

    /// Select the pattern for the given number of raw digits
    pub fn pattern_for(self, digit_count: usize) -> MaskPattern {
        match self {
            Self::TaxId if digit_count < 12 => CPF,
            Self::TaxId => CNPJ,
            Self::Phone if digit_count == 11 => MOBILE,
            Self::Phone => LANDLINE,
            Self::PostalCode => CEP,
        }
    }
}

/// A display template with digit slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskPattern {
    template: &'static str,
}

impl MaskPattern {
    pub const fn new(template: &'static str) -> Self {
        Self { template }
    }

    #[cfg(test)]
    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Number of digit slots in the template
    pub fn slots(&self) -> usize {
        self.template.chars().filter(|c| *c == DIGIT_SLOT).count()
    }

    /// Lay `digits` over the template.
    ///
    /// Literals are only written when another digit follows them, so partial
    /// input never ends with a separator. Digits past the last slot are dropped.
    pub fn apply(&self, digits: &str) -> String {
        let mut remaining = digits.chars().peekable();
        let mut out = String::with_capacity(self.template.len());
        let mut pending_literals = String::new();

        for slot in self.template.chars() {
            if remaining.peek().is_none() {
                break;
            }
            if slot == DIGIT_SLOT {
                out.push_str(&pending_literals);
                pending_literals.clear();
                if let Some(d) = remaining.next() {
                    out.push(d);
                }
            } else {
                pending_literals.push(slot);
            }
        }

        out
    }
}

/// Masked text together with the cursor position to restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedText {
    pub text: String,
    /// Cursor position in chars, always the end of `text`
    pub cursor: usize,
}

/// Strip everything that is not an ASCII digit
pub fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Reformat raw field text for display
pub fn mask(kind: MaskKind, raw: &str) -> String {
    let mut digits = digits_only(raw);
    digits.truncate(kind.max_digits());
    kind.pattern_for(digits.len()).apply(&digits)
}

/// Reformat raw field text and place the cursor at end-of-field
pub fn reformat(kind: MaskKind, raw: &str) -> MaskedText {
    let text = mask(kind, raw);
    let cursor = text.chars().count();
    MaskedText { text, cursor }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod tax_id {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_eleven_digits_use_cpf_layout() {
            assert_eq!(mask(MaskKind::TaxId, "12345678901"), "123.456.789-01");
        }

        #[test]
        fn test_fourteen_digits_use_cnpj_layout() {
            assert_eq!(
                mask(MaskKind::TaxId, "12345678000195"),
                "12.345.678/0001-95"
            );
        }

        #[test]
        fn test_pattern_switches_at_twelve_digits() {
            assert_eq!(MaskKind::TaxId.pattern_for(11).template(), "000.000.000-00");
            assert_eq!(
                MaskKind::TaxId.pattern_for(12).template(),
                "00.000.000/0000-00"
            );
        }

        #[test]
        fn test_partial_cpf_has_no_trailing_separator() {
            assert_eq!(mask(MaskKind::TaxId, "123"), "123");
            assert_eq!(mask(MaskKind::TaxId, "1234"), "123.4");
        }

        #[test]
        fn test_typing_past_cpf_relayouts_as_cnpj() {
            // User kept typing into an already masked CPF
            assert_eq!(mask(MaskKind::TaxId, "123.456.789-012"), "12.345.678/9012");
        }

        #[test]
        fn test_extra_digits_are_dropped() {
            assert_eq!(
                mask(MaskKind::TaxId, "1234567800019599"),
                "12.345.678/0001-95"
            );
        }
    }

    mod phone {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_eleven_digits_use_mobile_layout() {
            assert_eq!(mask(MaskKind::Phone, "11987654321"), "(11) 98765-4321");
        }

        #[test]
        fn test_ten_digits_use_landline_layout() {
            assert_eq!(mask(MaskKind::Phone, "1132654321"), "(11) 3265-4321");
        }

        #[test]
        fn test_partial_phone() {
            assert_eq!(mask(MaskKind::Phone, "1"), "(1");
            assert_eq!(mask(MaskKind::Phone, "11"), "(11");
            assert_eq!(mask(MaskKind::Phone, "113"), "(11) 3");
        }

        #[test]
        fn test_mobile_back_to_landline_on_delete() {
            let mobile = mask(MaskKind::Phone, "11987654321");
            let mut shortened = digits_only(&mobile);
            shortened.pop();
            assert_eq!(mask(MaskKind::Phone, &shortened), "(11) 9876-5432");
        }
    }

    mod postal_code {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_full_cep() {
            assert_eq!(mask(MaskKind::PostalCode, "01310100"), "01310-100");
        }

        #[test]
        fn test_five_digits_have_no_hyphen() {
            assert_eq!(mask(MaskKind::PostalCode, "01310"), "01310");
        }

        #[test]
        fn test_non_digits_are_ignored() {
            assert_eq!(mask(MaskKind::PostalCode, "01a31b0-1c00"), "01310-100");
        }
    }

    #[test]
    fn test_empty_input_stays_empty() {
        for kind in [MaskKind::TaxId, MaskKind::Phone, MaskKind::PostalCode] {
            assert_eq!(mask(kind, ""), "");
            assert_eq!(mask(kind, "abc"), "");
        }
    }

    #[test]
    fn test_mask_is_idempotent() {
        let samples = [
            (MaskKind::TaxId, "1234567"),
            (MaskKind::TaxId, "12345678901"),
            (MaskKind::TaxId, "12345678000195"),
            (MaskKind::Phone, "119876"),
            (MaskKind::Phone, "1132654321"),
            (MaskKind::Phone, "11987654321"),
            (MaskKind::PostalCode, "013101"),
            (MaskKind::PostalCode, "01310100"),
        ];
        for (kind, raw) in samples {
            let once = mask(kind, raw);
            assert_eq!(mask(kind, &once), once, "{kind:?} {raw}");
        }
    }

    #[test]
    fn test_reformat_puts_cursor_at_end() {
        let masked = reformat(MaskKind::Phone, "11987654321");
        assert_eq!(masked.text, "(11) 98765-4321");
        assert_eq!(masked.cursor, 15);

        let empty = reformat(MaskKind::TaxId, "");
        assert_eq!(empty.cursor, 0);
    }

    #[test]
    fn test_max_digits() {
        assert_eq!(MaskKind::TaxId.max_digits(), 14);
        assert_eq!(MaskKind::Phone.max_digits(), 11);
        assert_eq!(MaskKind::PostalCode.max_digits(), 8);
    }
}
