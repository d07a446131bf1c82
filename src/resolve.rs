use std::fmt;

use crate::error::ChartError;

/// The four encodings a scatterplot needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    X,
    Y,
    Size,
    Color,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::X, Role::Y, Role::Size, Role::Color];

    /// Human readable axis caption for the measurement behind the role.
    pub fn caption(self) -> &'static str {
        match self {
            Role::X => "Flipper Length",
            Role::Y => "Body Mass",
            Role::Size => "Bill Length",
            Role::Color => "Species",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::X => "x (flipper length)",
            Role::Y => "y (body mass)",
            Role::Size => "size (bill length)",
            Role::Color => "color (species)",
        };
        f.write_str(s)
    }
}

/// Ordered, case-sensitive column aliases per role.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasTable {
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub size: Vec<String>,
    pub color: Vec<String>,
}

impl AliasTable {
    pub fn aliases(&self, role: Role) -> &[String] {
        match role {
            Role::X => &self.x,
            Role::Y => &self.y,
            Role::Size => &self.size,
            Role::Color => &self.color,
        }
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            x: owned(&[
                "flipper_length",
                "flipper_length_mm",
                "Flipper Length",
                "Flipper Length (mm)",
                "flipper_length (mm)",
            ]),
            y: owned(&[
                "body_mass",
                "body_mass_g",
                "Body Mass",
                "Body Mass (g)",
                "body_mass (g)",
            ]),
            size: owned(&[
                "bill_length",
                "bill_length_mm",
                "Bill Length",
                "Bill Length (mm)",
                "bill_length (mm)",
            ]),
            color: owned(&["species", "Species"]),
        }
    }
}

/// Literal column names chosen for each role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleBinding {
    pub x: String,
    pub y: String,
    pub size: String,
    pub color: String,
}

impl RoleBinding {
    pub fn column(&self, role: Role) -> &str {
        match role {
            Role::X => &self.x,
            Role::Y => &self.y,
            Role::Size => &self.size,
            Role::Color => &self.color,
        }
    }
}

/// Pick the first alias of each role that appears in `columns`.
///
/// All four roles are attempted before failing so the error can name every
/// role that went unmatched.
pub fn resolve(columns: &[String], aliases: &AliasTable) -> Result<RoleBinding, ChartError> {
    let pick = |role: Role| -> Option<String> {
        aliases
            .aliases(role)
            .iter()
            .find(|alias| columns.iter().any(|c| c == *alias))
            .cloned()
    };

    let x = pick(Role::X);
    let y = pick(Role::Y);
    let size = pick(Role::Size);
    let color = pick(Role::Color);

    match (x, y, size, color) {
        (Some(x), Some(y), Some(size), Some(color)) => Ok(RoleBinding { x, y, size, color }),
        (x, y, size, color) => {
            let missing = [
                (Role::X, x.is_none()),
                (Role::Y, y.is_none()),
                (Role::Size, size.is_none()),
                (Role::Color, color.is_none()),
            ]
            .into_iter()
            .filter_map(|(role, absent)| absent.then_some(role))
            .collect();

            Err(ChartError::UnresolvedColumns {
                missing,
                found: columns.to_vec(),
            })
        }
    }
}
