//! Localized user-facing messages
//!
//! Each crate keeps its message templates in a Fluent resource under
//! `locales/zh-CN/` and renders them through a [`Catalog`]. Isolation marks
//! are disabled, so rendered text is exactly the template text with the
//! arguments substituted.

use fluent::{FluentArgs, FluentBundle, FluentResource};
use tracing::warn;
use unic_langid::LanguageIdentifier;

/// Locale of every bundled resource
pub const LOCALE: &str = "zh-CN";

/// A Fluent bundle for one message resource
pub struct Catalog {
    bundle: FluentBundle<FluentResource>,
}

impl Catalog {
    /// Builds a catalog from Fluent source text
    ///
    /// Parse errors are logged; the entries that did parse remain usable.
    pub fn new(source: &str) -> Self {
        let locale: LanguageIdentifier = LOCALE.parse().unwrap_or_default();
        let mut bundle = FluentBundle::new(vec![locale]);
        bundle.set_use_isolating(false);

        let resource = match FluentResource::try_new(source.to_string()) {
            Ok(resource) => resource,
            Err((resource, errors)) => {
                warn!(?errors, "Message resource contains unparsable entries");
                resource
            }
        };
        if let Err(errors) = bundle.add_resource(resource) {
            warn!(?errors, "Message resource overrides existing entries");
        }

        Self { bundle }
    }

    /// Returns true if the catalog holds a message with this id
    pub fn has(&self, id: &str) -> bool {
        self.bundle.has_message(id)
    }

    /// Renders a message
    ///
    /// # Arguments
    ///
    /// * `id` - Message identifier
    /// * `args` - Named string arguments
    ///
    /// # Returns
    ///
    /// The rendered text, or the id itself if the catalog has no such message
    pub fn format(&self, id: &str, args: &[(&str, &str)]) -> String {
        let Some(pattern) = self.bundle.get_message(id).and_then(|message| message.value()) else {
            warn!(id, "Missing message");
            return id.to_string();
        };

        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, *value);
        }

        let mut errors = Vec::new();
        let text = self
            .bundle
            .format_pattern(pattern, Some(&fluent_args), &mut errors);
        if !errors.is_empty() {
            warn!(id, ?errors, "Message rendered with errors");
        }
        text.into_owned()
    }
}

/// Owner prefix: `"{owner}的"`, or nothing for an absent or empty owner
pub fn whose(owner: Option<&str>) -> String {
    match owner {
        Some(owner) if !owner.is_empty() => format!("{}的", owner),
        _ => String::new(),
    }
}

/// Detail suffix: `": {extra}"`, or nothing for an absent or empty message
pub fn detail(extra: Option<&str>) -> String {
    match extra {
        Some(extra) if !extra.is_empty() => format!(": {}", extra),
        _ => String::new(),
    }
}

thread_local! {
    static CORE: Catalog = Catalog::new(include_str!("../locales/zh-CN/core.ftl"));
}

/// Renders one of the engine's own messages
pub fn core_message(id: &str, args: &[(&str, &str)]) -> String {
    CORE.with(|catalog| catalog.format(id, args))
}

/// `请填写{whose}{label}`
pub fn required(owner: Option<&str>, label: &str) -> String {
    core_message("field-required", &[("whose", &whose(owner)), ("label", label)])
}

/// `请选择{whose}{label}`
pub fn select_required(owner: Option<&str>, label: &str) -> String {
    core_message(
        "field-select-required",
        &[("whose", &whose(owner)), ("label", label)],
    )
}

/// `{whose}{label}格式不正确{detail}`
pub fn format_incorrect(owner: Option<&str>, label: &str, extra: Option<&str>) -> String {
    core_message(
        "field-format-incorrect",
        &[
            ("whose", &whose(owner)),
            ("label", label),
            ("detail", &detail(extra)),
        ],
    )
}

/// `{whose}{label}不受支持{detail}`
pub fn not_supported(owner: Option<&str>, label: &str, extra: Option<&str>) -> String {
    core_message(
        "field-not-supported",
        &[
            ("whose", &whose(owner)),
            ("label", label),
            ("detail", &detail(extra)),
        ],
    )
}

/// `必须设置{whose}{label}的值`
pub fn nested_required(owner: Option<&str>, label: &str) -> String {
    core_message("nested-required", &[("whose", &whose(owner)), ("label", label)])
}
