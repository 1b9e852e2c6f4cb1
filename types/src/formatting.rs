//! Centralized text formatting for indicator labels.
//!
//! Every string that ends up on the overlay goes through this module so the
//! engine and the compositor agree on what a row or a total reads like.

/// Placeholder replaced by the captured subject in special-rule templates.
pub const SUBJECT_PLACEHOLDER: &str = "{subject}";

/// Placeholder spelling used by older settings files.
pub const LEGACY_SUBJECT_PLACEHOLDER: &str = "{monster_name}";

/// Subject used when a rule captures no actor name.
pub const UNKNOWN_SUBJECT: &str = "Unknown";

/// Substitute the subject into a message template.
///
/// Every occurrence of [`SUBJECT_PLACEHOLDER`] or
/// [`LEGACY_SUBJECT_PLACEHOLDER`] is replaced; templates without a
/// placeholder are returned unchanged.
///
/// # Examples
/// ```
/// use spellfloat_types::formatting::render_template;
/// assert_eq!(render_template("{subject} was mezzed!", "Orc"), "Orc was mezzed!");
/// assert_eq!(render_template("{monster_name} was mezzed!", "Orc"), "Orc was mezzed!");
/// assert_eq!(render_template("Spirit of the wolf", "Unknown"), "Spirit of the wolf");
/// ```
pub fn render_template(template: &str, subject: &str) -> String {
    template
        .replace(SUBJECT_PLACEHOLDER, subject)
        .replace(LEGACY_SUBJECT_PLACEHOLDER, subject)
}

/// Format the text of a damage row.
///
/// # Examples
/// ```
/// use spellfloat_types::formatting::format_amount;
/// assert_eq!(format_amount(0), "0");
/// assert_eq!(format_amount(1_500), "1500");
/// ```
pub fn format_amount(amount: u64) -> String {
    amount.to_string()
}

/// Format the totals row shown under groups with several damage rows.
///
/// # Examples
/// ```
/// use spellfloat_types::formatting::format_total;
/// assert_eq!(format_total("Ogre", 350), "Ogre - Total Damage: 350");
/// assert_eq!(format_total("", 42), "Total Damage: 42");
/// ```
pub fn format_total(subject: &str, total: u64) -> String {
    if subject.is_empty() {
        format!("Total Damage: {}", total)
    } else {
        format!("{} - Total Damage: {}", subject, total)
    }
}

/// Human-readable name of a category key, used for anchor markers.
///
/// Underscores become spaces and only the first letter is capitalized.
///
/// # Examples
/// ```
/// use spellfloat_types::formatting::category_display_name;
/// assert_eq!(category_display_name("crowd_control"), "Crowd control");
/// assert_eq!(category_display_name("DAMAGE"), "Damage");
/// assert_eq!(category_display_name(""), "");
/// ```
pub fn category_display_name(category: &str) -> String {
    let spaced = category.replace('_', " ").to_lowercase();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
