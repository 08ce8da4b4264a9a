use std::fmt;

pub const ADMIN_ROLE: &str = "admin";
pub const WRITER_ROLE: &str = "writer";

/// Privilege level derived from a role name. Anything that is not `admin`
/// or `writer`, including a missing role, is a plain reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    Reader,
    Writer,
    Admin,
}

impl Role {
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some(ADMIN_ROLE) => Role::Admin,
            Some(WRITER_ROLE) => Role::Writer,
            _ => Role::Reader,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    /// Writers and admins may author content.
    pub fn is_writer(self) -> bool {
        self >= Role::Writer
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Reader => "reader",
            Role::Writer => WRITER_ROLE,
            Role::Admin => ADMIN_ROLE,
        };
        f.write_str(name)
    }
}
