pub mod compare;
pub mod key;

pub use self::compare::{
    horizontal_string_compare, locale_compare, number_compare, vertical_string_compare,
    Comparator,
};
pub use self::key::Key;

/// Maps a record to the key of the bucket it belongs to on one axis.
pub type FacetFn<'a, T> = Box<dyn Fn(&T) -> Key + Send + Sync + 'a>;

/// The default facet: every record lands in the single "no facet" bucket.
pub fn no_facet<T>(_: &T) -> Key {
    Key::Undefined
}

/// Box a closure as a facet function.
pub fn facet_fn<'a, T, F>(f: F) -> FacetFn<'a, T>
where
    F: Fn(&T) -> Key + Send + Sync + 'a,
{
    Box::new(f)
}
