use tracing::debug;

use crate::code::SuffixSource;
use crate::roles::RoleTable;

pub const ROLE_FIELD_ID: &str = "id_role";
pub const CODE_FIELD_ID: &str = "id_staff_code";

/// A form element holding a string value.
pub trait Field {
    fn id(&self) -> &str;
    fn value(&self) -> &str;
    fn set_value(&mut self, value: String);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    id: String,
    value: String,
}

impl InputField {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        InputField {
            id: id.into(),
            value: value.into(),
        }
    }
}

impl Field for InputField {
    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: String) {
        self.value = value;
    }
}

/// Keeps the staff code field in step with the role field.
pub struct AutoCodeAssigner<F, S> {
    role: F,
    code: F,
    table: RoleTable,
    source: S,
}

impl<F: Field, S: SuffixSource> AutoCodeAssigner<F, S> {
    /// Attach to the two fields. Returns `None` without touching anything if
    /// either is missing. A role that is already selected gets its code
    /// assigned right away.
    pub fn initialize(
        role: Option<F>,
        code: Option<F>,
        table: RoleTable,
        source: S,
    ) -> Option<Self> {
        let (Some(role), Some(code)) = (role, code) else {
            debug!("role or staff code field missing, assigner not attached");
            return None;
        };
        let mut assigner = AutoCodeAssigner {
            role,
            code,
            table,
            source,
        };
        debug!(
            role_field = assigner.role.id(),
            code_field = assigner.code.id(),
            role = assigner.role.value(),
            "assigner attached"
        );
        if assigner.table.is_recognized(assigner.role.value()) {
            assigner.role_changed();
        }
        Some(assigner)
    }

    /// Change handler: one write to the code field per call.
    pub fn role_changed(&mut self) {
        let role = self.role.value();
        let value = if self.table.is_recognized(role) {
            self.table.generate(role, &mut self.source)
        } else {
            String::new()
        };
        if value.is_empty() {
            debug!(role, "unrecognized role, staff code cleared");
        } else {
            debug!(role, code = %value, "staff code regenerated");
        }
        self.code.set_value(value);
    }

    /// A user picking `value` in the role field.
    pub fn select_role(&mut self, value: impl Into<String>) {
        self.role.set_value(value.into());
        self.role_changed();
    }

    pub fn role_field(&self) -> &F {
        &self.role
    }

    pub fn code_field(&self) -> &F {
        &self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{RandomSuffix, StaffCode};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fields(role: &str) -> (Option<InputField>, Option<InputField>) {
        (
            Some(InputField::new(ROLE_FIELD_ID, role)),
            Some(InputField::new(CODE_FIELD_ID, "")),
        )
    }

    fn counter(start: u16) -> impl FnMut() -> u16 {
        let mut n = start;
        move || {
            let out = n;
            n += 1;
            out
        }
    }

    fn assert_code(value: &str, prefix: &str) {
        let code: StaffCode = value.parse().unwrap();
        assert_eq!(code.prefix, prefix, "{value}");
    }

    #[test]
    fn preselected_intern_filled_on_load() {
        let (role, code) = fields("Intern");
        let assigner =
            AutoCodeAssigner::initialize(role, code, RoleTable::default(), counter(2000)).unwrap();
        assert_eq!(assigner.code_field().value(), "nxrint2000");
    }

    #[test]
    fn preselected_random_matches_pattern() {
        let (role, code) = fields("Intern");
        let source = RandomSuffix(ChaCha8Rng::seed_from_u64(11));
        let assigner =
            AutoCodeAssigner::initialize(role, code, RoleTable::default(), source).unwrap();
        assert_code(assigner.code_field().value(), "nxrint");
    }

    #[test]
    fn no_role_selected_leaves_code_alone() {
        let role = Some(InputField::new(ROLE_FIELD_ID, ""));
        let code = Some(InputField::new(CODE_FIELD_ID, "prefilled"));
        let assigner =
            AutoCodeAssigner::initialize(role, code, RoleTable::default(), counter(1000)).unwrap();
        assert_eq!(assigner.code_field().value(), "prefilled");
    }

    #[test]
    fn intern_to_employee() {
        let (role, code) = fields("Intern");
        let mut assigner =
            AutoCodeAssigner::initialize(role, code, RoleTable::default(), counter(1000)).unwrap();
        assert_eq!(assigner.code_field().value(), "nxrint1000");
        assigner.select_role("Employee");
        assert_eq!(assigner.role_field().value(), "Employee");
        assert_eq!(assigner.code_field().value(), "nxremp1001");
    }

    #[test]
    fn unrecognized_role_clears() {
        let (role, code) = fields("Employee");
        let mut assigner =
            AutoCodeAssigner::initialize(role, code, RoleTable::default(), counter(1000)).unwrap();
        assigner.select_role("");
        assert_eq!(assigner.code_field().value(), "");
        assigner.select_role("Employee");
        assigner.select_role("Manager");
        assert_eq!(assigner.code_field().value(), "");
    }

    #[test]
    fn same_role_regenerates() {
        let (role, code) = fields("");
        let mut assigner =
            AutoCodeAssigner::initialize(role, code, RoleTable::default(), counter(5000)).unwrap();
        assigner.select_role("Intern");
        let first = assigner.code_field().value().to_string();
        assigner.role_changed();
        let second = assigner.code_field().value().to_string();
        assert_eq!(first, "nxrint5000");
        assert_eq!(second, "nxrint5001");
    }

    #[test]
    fn missing_field_attaches_nothing() {
        let mut draws = 0;
        let source = || {
            draws += 1;
            1234_u16
        };
        let role = Some(InputField::new(ROLE_FIELD_ID, "Intern"));
        assert!(AutoCodeAssigner::initialize(role, None, RoleTable::default(), source).is_none());
        assert_eq!(draws, 0);

        let code = Some(InputField::new(CODE_FIELD_ID, ""));
        let none: Option<AutoCodeAssigner<InputField, _>> =
            AutoCodeAssigner::initialize(None, code, RoleTable::default(), counter(1000));
        assert!(none.is_none());
    }

    #[test]
    fn fields_keep_their_ids() {
        let (role, code) = fields("Intern");
        let mut assigner =
            AutoCodeAssigner::initialize(role, code, RoleTable::default(), counter(9998)).unwrap();
        assigner.select_role("Employee");
        assert_eq!(assigner.role_field().id(), ROLE_FIELD_ID);
        assert_eq!(assigner.code_field().id(), CODE_FIELD_ID);
        assert_eq!(assigner.code_field().value(), "nxremp9999");
    }
}
