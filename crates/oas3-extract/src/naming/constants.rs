pub(crate) const PARAMETER_SEPARATOR: &str = "/.";
pub(crate) const PROPERTY_SEPARATOR: char = '.';
pub(crate) const MEMBER_MARKER: char = '#';
pub(crate) const ARRAY_ITEM_MARKER: &str = "[]";
pub(crate) const NULLABLE_MARKER: char = '?';
pub(crate) const REQUEST_SEGMENT: &str = "request";
