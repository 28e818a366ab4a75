//! Field resolution: maps a logical field name to the value a condition
//! compares against.
//!
//! Most logical fields are computed from several stored attributes (payment
//! status, price, size category, flags). Any other name reads the stored
//! attribute of that name unchanged, so ad-hoc fields work without touching
//! this module.

use std::borrow::Cow;

use serde_json::Value;

use crate::models::{Person, TaskInfo};
use crate::pricing::{category_of, is_no_selection, price_of};

/// A logical field a condition can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field<'a> {
    /// `'paid'` or `'unpaid'`.
    PaymentStatus,
    /// `'withPrint'` or `'plain'`.
    PrintStatus,
    /// Shirt price.
    Amount,
    /// Size category label.
    Categories,
    /// Trimmed full name.
    Name,
    HasNotes,
    HasTasks,
    HasOverdueTasks,
    MissingContact,
    /// `'given'` or `'pending'`.
    DistributionStatus,
    MissingSize,
    /// `'registered'` or `'notRegistered'`.
    RegistrationStatus,
    /// `'checkedIn'` or `'notCheckedIn'`.
    CheckInStatus,
    HasShirtOrder,
    MissingInfo,
    /// Any other name: the stored attribute itself.
    Raw(&'a str),
}

impl<'a> Field<'a> {
    /// Parses a field name. Unrecognized names become [`Field::Raw`].
    pub fn parse(name: &'a str) -> Self {
        match name {
            "paymentStatus" => Field::PaymentStatus,
            "printStatus" => Field::PrintStatus,
            "amount" => Field::Amount,
            "categories" => Field::Categories,
            "name" => Field::Name,
            "hasNotes" => Field::HasNotes,
            "hasTasks" => Field::HasTasks,
            "hasOverdueTasks" => Field::HasOverdueTasks,
            "missingContact" => Field::MissingContact,
            "distributionStatus" => Field::DistributionStatus,
            "missingSize" => Field::MissingSize,
            "registrationStatus" => Field::RegistrationStatus,
            "checkInStatus" => Field::CheckInStatus,
            "hasShirtOrder" => Field::HasShirtOrder,
            "missingInfo" => Field::MissingInfo,
            other => Field::Raw(other),
        }
    }

    /// Returns true if the field is computed rather than read as stored.
    pub fn is_computed(&self) -> bool {
        !matches!(self, Field::Raw(_))
    }
}

/// Resolves a field name against a person.
pub fn resolve<'p>(person: &'p Person, field: &str, task_info: Option<&TaskInfo>) -> Cow<'p, Value> {
    resolve_field(person, Field::parse(field), task_info)
}

/// Resolves a parsed field against a person.
///
/// Never fails: missing or malformed attributes resolve to the field's
/// default (`false`, `''`, `0`, or `null` for raw lookups).
pub fn resolve_field<'p>(
    person: &'p Person,
    field: Field<'_>,
    task_info: Option<&TaskInfo>,
) -> Cow<'p, Value> {
    let value = match field {
        Field::PaymentStatus => Value::from(if person.is_paid() { "paid" } else { "unpaid" }),
        Field::PrintStatus => Value::from(if person.has_print() {
            "withPrint"
        } else {
            "plain"
        }),
        Field::Amount => Value::from(price_of(&person.shirt_size(), person.has_print())),
        Field::Categories => Value::from(category_of(&person.shirt_size()).as_str()),
        Field::Name => Value::from(person.full_name()),
        Field::HasNotes => Value::from(task_info.is_some_and(|info| info.has_notes)),
        Field::HasTasks => Value::from(task_info.is_some_and(|info| info.has_tasks)),
        Field::HasOverdueTasks => {
            Value::from(task_info.is_some_and(TaskInfo::has_overdue_tasks))
        }
        Field::MissingContact => Value::from(!person.flag("contactNumber")),
        Field::DistributionStatus => Value::from(if person.shirt_given() {
            "given"
        } else {
            "pending"
        }),
        Field::MissingSize => Value::from(missing_size(person)),
        Field::RegistrationStatus => Value::from(if is_registered(person) {
            "registered"
        } else {
            "notRegistered"
        }),
        Field::CheckInStatus => Value::from(if is_checked_in(person) {
            "checkedIn"
        } else {
            "notCheckedIn"
        }),
        Field::HasShirtOrder => Value::from(has_shirt_order(person)),
        Field::MissingInfo => Value::from(
            !person.flag("firstName") || !person.flag("lastName") || !person.flag("contactNumber"),
        ),
        Field::Raw("id") => person.id.to_value(),
        Field::Raw(name) => {
            return person
                .attribute(name)
                .map(Cow::Borrowed)
                .unwrap_or(Cow::Owned(Value::Null))
        }
    };

    Cow::Owned(value)
}

/// True when no usable size was chosen.
pub fn missing_size(person: &Person) -> bool {
    is_no_selection(&person.shirt_size())
}

/// True when a shirt was ordered.
///
/// `'None yet'` is not excluded here; an undecided size still counts as an
/// order.
pub fn has_shirt_order(person: &Person) -> bool {
    let size = person.shirt_size();
    !matches!(size.as_ref(), "" | "No shirt" | "Select Size")
}

/// True when registered or already checked in.
pub fn is_registered(person: &Person) -> bool {
    person.registration_status() == Some("Registered") || is_checked_in(person)
}

/// True when checked in.
pub fn is_checked_in(person: &Person) -> bool {
    person.check_in_status() == Some("Checked In")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolved(person: &Person, field: &str) -> Value {
        resolve(person, field, None).into_owned()
    }

    #[test]
    fn test_payment_and_print_status() {
        let paid = Person::new(1).with("paid", true).with("hasPrint", true);
        let unpaid = Person::new(2);

        assert_eq!(resolved(&paid, "paymentStatus"), json!("paid"));
        assert_eq!(resolved(&unpaid, "paymentStatus"), json!("unpaid"));
        assert_eq!(resolved(&paid, "printStatus"), json!("withPrint"));
        assert_eq!(resolved(&unpaid, "printStatus"), json!("plain"));
    }

    #[test]
    fn test_amount_and_category() {
        let plain = Person::new(1).with("shirtSize", "M");
        let printed = Person::new(2).with("shirtSize", "TS").with("hasPrint", true);
        let none = Person::new(3).with("shirtSize", "No shirt").with("hasPrint", true);

        assert_eq!(resolved(&plain, "amount"), json!(119));
        assert_eq!(resolved(&printed, "amount"), json!(220));
        assert_eq!(resolved(&none, "amount"), json!(0));
        assert_eq!(resolved(&plain, "categories"), json!("Adult"));
        assert_eq!(resolved(&printed, "categories"), json!("Teen"));
        assert_eq!(resolved(&none, "categories"), json!("No Order"));
        assert_eq!(resolved(&Person::new(4), "categories"), json!("No Order"));
    }

    #[test]
    fn test_name_is_trimmed() {
        let person = Person::new(1).with("firstName", "Ana");
        assert_eq!(resolved(&person, "name"), json!("Ana"));
    }

    #[test]
    fn test_task_info_fields_default_false() {
        let person = Person::new(1);
        assert_eq!(resolved(&person, "hasNotes"), json!(false));
        assert_eq!(resolved(&person, "hasTasks"), json!(false));
        assert_eq!(resolved(&person, "hasOverdueTasks"), json!(false));
    }

    #[test]
    fn test_task_info_fields() {
        let person = Person::new(1);
        let info = TaskInfo {
            has_notes: true,
            has_tasks: true,
            incomplete_tasks_count: 1,
            ..Default::default()
        };

        assert_eq!(resolve(&person, "hasNotes", Some(&info)).into_owned(), json!(true));
        assert_eq!(
            resolve(&person, "hasOverdueTasks", Some(&info)).into_owned(),
            json!(true)
        );
    }

    #[test]
    fn test_missing_contact_and_info() {
        let complete = Person::new(1)
            .with("firstName", "Ana")
            .with("lastName", "Cruz")
            .with("contactNumber", "0917");
        let blank_contact = Person::new(2)
            .with("firstName", "Ben")
            .with("lastName", "Reyes")
            .with("contactNumber", "");

        assert_eq!(resolved(&complete, "missingContact"), json!(false));
        assert_eq!(resolved(&complete, "missingInfo"), json!(false));
        assert_eq!(resolved(&blank_contact, "missingContact"), json!(true));
        assert_eq!(resolved(&blank_contact, "missingInfo"), json!(true));
    }

    #[test]
    fn test_missing_size_and_shirt_order() {
        let cases = [
            (json!(null), true, false),
            (json!(""), true, false),
            (json!("Select Size"), true, false),
            (json!("No shirt"), true, false),
            (json!("None yet"), true, true),
            (json!("L"), false, true),
        ];

        for (size, missing, ordered) in cases {
            let person = Person::new(1).with("shirtSize", size.clone());
            assert_eq!(resolved(&person, "missingSize"), json!(missing), "size {size}");
            assert_eq!(resolved(&person, "hasShirtOrder"), json!(ordered), "size {size}");
        }
    }

    #[test]
    fn test_registration_and_check_in() {
        let registered = Person::new(1).with("registrationStatus", "Registered");
        let checked_in = Person::new(2).with("checkInStatus", "Checked In");
        let neither = Person::new(3).with("registrationStatus", "registered");

        assert_eq!(resolved(&registered, "registrationStatus"), json!("registered"));
        assert_eq!(resolved(&registered, "checkInStatus"), json!("notCheckedIn"));
        assert_eq!(resolved(&checked_in, "registrationStatus"), json!("registered"));
        assert_eq!(resolved(&checked_in, "checkInStatus"), json!("checkedIn"));
        assert_eq!(resolved(&neither, "registrationStatus"), json!("notRegistered"));
    }

    #[test]
    fn test_distribution_status() {
        assert_eq!(
            resolved(&Person::new(1).with("shirtGiven", true), "distributionStatus"),
            json!("given")
        );
        assert_eq!(resolved(&Person::new(2), "distributionStatus"), json!("pending"));
    }

    #[test]
    fn test_raw_pass_through() {
        let person = Person::new(5).with("location", "Cobol").with("ageBracket", "Youth");

        assert_eq!(resolved(&person, "location"), json!("Cobol"));
        assert_eq!(resolved(&person, "ageBracket"), json!("Youth"));
        assert_eq!(resolved(&person, "id"), json!(5));
        assert_eq!(resolved(&person, "doesNotExist"), Value::Null);
        assert!(matches!(resolve(&person, "location", None), Cow::Borrowed(_)));
    }

    #[test]
    fn test_field_parse() {
        assert_eq!(Field::parse("amount"), Field::Amount);
        assert_eq!(Field::parse("location"), Field::Raw("location"));
        assert!(Field::parse("missingInfo").is_computed());
        assert!(!Field::parse("shirtSize").is_computed());
    }
}
