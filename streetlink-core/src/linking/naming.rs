use itertools::Itertools;

/// Produces display names for locations the resolver synthesizes
pub trait LocationNamer: Send + Sync {
    /// Name of the corner where two streets meet
    fn corner(&self, first: &str, second: &str, locale: &str) -> String;

    /// Name used when no street at a corner has a name
    fn unnamed_street(&self, locale: &str) -> String;
}

/// English names regardless of locale
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamer;

impl LocationNamer for DefaultNamer {
    fn corner(&self, first: &str, second: &str, _locale: &str) -> String {
        format!("{first} & {second}")
    }

    fn unnamed_street(&self, _locale: &str) -> String {
        "unnamed street".to_string()
    }
}

/// Name for a corner from the street names meeting there, in the order
/// they were seen. Duplicates and empty names are dropped.
pub fn corner_name<'a>(
    namer: &dyn LocationNamer,
    street_names: impl IntoIterator<Item = &'a str>,
    locale: &str,
) -> String {
    let names: Vec<&str> = street_names
        .into_iter()
        .filter(|name| !name.is_empty())
        .unique()
        .take(2)
        .collect();
    match names.as_slice() {
        [first, second] => namer.corner(first, second, locale),
        [only] => (*only).to_string(),
        _ => namer.unnamed_street(locale),
    }
}
