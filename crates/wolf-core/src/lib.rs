#![deny(warnings)]
pub mod belief;
pub mod content;
pub mod model;
pub mod stats;
pub mod talk;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "wolfpack"
    }

    pub const fn codename() -> &'static str {
        "Village Ledger"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "wolfpack");
        assert_eq!(AppInfo::codename(), "Village Ledger");
        assert!(!AppInfo::version().is_empty());
    }
}
