//! Messages of the claim business checks

use core_kernel::messages::Catalog;

thread_local! {
    static CLAIMS: Catalog = Catalog::new(include_str!("../locales/zh-CN/claims.ftl"));
}

/// Renders a claims message; none of them take arguments
pub fn message(id: &str) -> String {
    CLAIMS.with(|catalog| catalog.format(id, &[]))
}
