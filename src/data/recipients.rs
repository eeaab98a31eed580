use crate::data::record::{FieldValue, Record};
use crate::data::record_stats::{is_valid_email, is_valid_phone, normalize_phone};

/// One reachable record, identified by its identity value
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub id: FieldValue,
    pub address: String,
}

/// Recipient set for a bulk message run, split by channel.
///
/// Built from whatever sequence the caller wants to target, usually the
/// derived view, and preserving its order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipients {
    pub phones: Vec<Recipient>,
    pub emails: Vec<Recipient>,
    /// Identities with neither a valid phone nor a valid email
    pub unreachable: Vec<FieldValue>,
}

impl Recipients {
    pub fn from_records(
        records: &[Record],
        id_field: &str,
        phone_field: &str,
        email_field: &str,
    ) -> Self {
        let mut recipients = Recipients::default();

        for record in records {
            let id = record.value(id_field).clone();
            let phone = record.value(phone_field).to_string();
            let email = record.value(email_field).to_string();

            let mut reachable = false;
            if is_valid_phone(&phone) {
                recipients.phones.push(Recipient {
                    id: id.clone(),
                    address: normalize_phone(&phone),
                });
                reachable = true;
            }
            if is_valid_email(&email) {
                recipients.emails.push(Recipient {
                    id: id.clone(),
                    address: email.trim().to_string(),
                });
                reachable = true;
            }
            if !reachable {
                recipients.unreachable.push(id);
            }
        }

        recipients
    }

    pub fn is_empty(&self) -> bool {
        self.phones.is_empty() && self.emails.is_empty()
    }
}
