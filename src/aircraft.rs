use std::cmp::Ordering;
use std::sync::Arc;

pub type AircraftCode = Arc<str>;
pub type Category = Arc<str>;

pub const UNKNOWN_CATEGORY: &str = "Unknown";

pub const CANONICAL_CATEGORIES: [&str; 10] =
    ["1B", "2B", "3B", "2C", "3C", "3D", "4C", "4D", "4E", "4F"];

const CATEGORY_TABLE: [(&str, &str); 53] = [
    ("A124", "4F"),
    ("A20N", "3C"),
    ("A21N", "4C"),
    ("A30B", "4D"),
    ("A319", "3C"),
    ("A320", "4C"),
    ("A321", "4C"),
    ("A332", "4E"),
    ("A333", "4E"),
    ("A339", "4E"),
    ("A342", "4E"),
    ("A343", "4E"),
    ("A345", "4E"),
    ("A346", "4E"),
    ("A359", "4E"),
    ("A35K", "4E"),
    ("A388", "4F"),
    ("ATR", "2C"),
    ("B190", "2B"),
    ("B38M", "4C"),
    ("B39M", "4C"),
    ("B703", "4D"),
    ("B722", "4C"),
    ("B733", "4C"),
    ("B734", "4C"),
    ("B736", "3C"),
    ("B737", "4C"),
    ("B738", "4C"),
    ("B739", "4C"),
    ("B743", "4E"),
    ("B744", "4E"),
    ("B748", "4F"),
    ("B753", "4D"),
    ("B762", "4D"),
    ("B763", "4D"),
    ("B764", "4D"),
    ("B772", "4E"),
    ("B773", "4E"),
    ("B77L", "4E"),
    ("B77W", "4E"),
    ("B788", "4E"),
    ("B789", "4E"),
    ("B78X", "4E"),
    ("C208", "1B"),
    ("CRJ2", "3B"),
    ("E145", "3B"),
    ("E190", "4C"),
    ("E195", "4C"),
    ("E295", "3C"),
    ("IL76", "3D"),
    ("L101", "4D"),
    ("MD11", "4D"),
    ("T204", "4D"),
];

pub fn category_of(aircraft: &str) -> Option<&'static str> {
    CATEGORY_TABLE
        .binary_search_by(|(code, _)| (*code).cmp(aircraft))
        .ok()
        .map(|i| CATEGORY_TABLE[i].1)
}

/// Canonical categories first, anything else alphabetically after them.
pub fn compare_categories(a: &str, b: &str) -> Ordering {
    let rank = |c: &str| CANONICAL_CATEGORIES.iter().position(|x| *x == c);
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
