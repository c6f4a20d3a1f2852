//! Built-in name corpora.

use std::sync::{Arc, OnceLock};

use crate::errors::ConfigurationError;
use crate::person::Gender;

pub const DEFAULT_TITLES_MALE: &[&str] = &["Mr", "Dr", "Prof", "Sir", "Rev"];

pub const DEFAULT_TITLES_FEMALE: &[&str] = &["Mrs", "Ms", "Miss", "Dr", "Prof", "Dame"];

pub const DEFAULT_FIRST_NAMES_MALE: &[&str] = &[
    "Aaron", "Adam", "Alan", "Albert", "Andrew", "Anthony", "Arthur", "Benjamin", "Brandon",
    "Brian", "Carl", "Charles", "Christopher", "Daniel", "David", "Dennis", "Donald", "Douglas",
    "Edward", "Eric", "Frank", "Gary", "George", "Gregory", "Harold", "Henry", "Jack", "Jacob",
    "James", "Jason", "Jeffrey", "Jeremy", "John", "Jonathan", "Joseph", "Joshua", "Justin",
    "Keith", "Kenneth", "Kevin", "Larry", "Lawrence", "Mark", "Matthew", "Michael", "Nathan",
    "Nicholas", "Patrick", "Paul", "Peter", "Philip", "Raymond", "Richard", "Robert", "Roger",
    "Ronald", "Ryan", "Samuel", "Scott", "Stephen", "Steven", "Terry", "Thomas", "Timothy",
    "Walter", "William",
];

pub const DEFAULT_FIRST_NAMES_FEMALE: &[&str] = &[
    "Abigail", "Alice", "Amanda", "Amy", "Andrea", "Angela", "Anna", "Ashley", "Barbara",
    "Betty", "Brenda", "Carol", "Catherine", "Christine", "Cynthia", "Deborah", "Diana", "Donna",
    "Dorothy", "Elizabeth", "Emily", "Emma", "Evelyn", "Frances", "Gloria", "Grace", "Hannah",
    "Heather", "Helen", "Jacqueline", "Janet", "Jennifer", "Jessica", "Joan", "Joyce", "Judith",
    "Julia", "Karen", "Katherine", "Kathleen", "Kimberly", "Laura", "Linda", "Lisa", "Margaret",
    "Maria", "Marilyn", "Martha", "Mary", "Megan", "Melissa", "Michelle", "Nancy", "Nicole",
    "Olivia", "Pamela", "Rachel", "Rebecca", "Ruth", "Samantha", "Sandra", "Sarah", "Sharon",
    "Shirley", "Sophia", "Stephanie", "Susan", "Teresa", "Victoria", "Virginia",
];

pub const DEFAULT_MIDDLE_NAMES_MALE: &[&str] = &[
    "Alexander", "Allen", "Bernard", "Cole", "Dean", "Elliot", "Francis", "Glenn", "Grant",
    "Howard", "Isaac", "Jay", "Lee", "Leon", "Louis", "Martin", "Miles", "Neil", "Oliver",
    "Owen", "Ray", "Reid", "Russell", "Wayne", "Wesley",
];

pub const DEFAULT_MIDDLE_NAMES_FEMALE: &[&str] = &[
    "Ann", "Beatrice", "Belle", "Claire", "Dawn", "Eleanor", "Elise", "Faith", "Fay", "Hope",
    "Irene", "Jane", "Jean", "Joy", "June", "Kate", "Lynn", "Mae", "Marie", "May", "Nicole",
    "Pearl", "Renee", "Rose", "Sue",
];

pub const DEFAULT_LAST_NAMES: &[&str] = &[
    "Adams", "Allen", "Anderson", "Baker", "Bennett", "Brooks", "Brown", "Campbell", "Carter",
    "Clark", "Collins", "Cook", "Cooper", "Davis", "Edwards", "Evans", "Fisher", "Foster",
    "Garcia", "Gray", "Green", "Hall", "Harris", "Hayes", "Hill", "Howard", "Hughes", "Jackson",
    "Jenkins", "Johnson", "Jones", "Kelly", "King", "Lewis", "Long", "Martin", "Miller",
    "Mitchell", "Moore", "Morgan", "Morris", "Murphy", "Nelson", "Parker", "Perry", "Phillips",
    "Powell", "Price", "Reed", "Richardson", "Roberts", "Robinson", "Rogers", "Ross", "Russell",
    "Sanders", "Scott", "Smith", "Stewart", "Sullivan", "Taylor", "Thompson", "Turner", "Walker",
    "Ward", "Watson", "White", "Williams", "Wilson", "Wood", "Wright", "Young",
];

/// Which list of the corpus a selection draws from, in selection order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameList {
    Title,
    FirstName,
    MiddleName,
    LastName,
}

impl NameList {
    pub const ALL: [NameList; 4] = [
        NameList::Title,
        NameList::FirstName,
        NameList::MiddleName,
        NameList::LastName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NameList::Title => "title",
            NameList::FirstName => "first name",
            NameList::MiddleName => "middle name",
            NameList::LastName => "last name",
        }
    }
}

/// One list per gender.
#[derive(Debug, Clone, Default)]
pub struct GenderedList {
    pub male: Vec<String>,
    pub female: Vec<String>,
}

impl GenderedList {
    pub fn new(male: &[&str], female: &[&str]) -> Self {
        Self {
            male: male.iter().map(|value| value.to_string()).collect(),
            female: female.iter().map(|value| value.to_string()).collect(),
        }
    }

    pub fn for_gender(&self, gender: Gender) -> &[String] {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }
}

/// Gender-partitioned lists of titles and names.
#[derive(Debug, Clone, Default)]
pub struct NameCorpus {
    pub titles: GenderedList,
    pub first_names: GenderedList,
    pub middle_names: GenderedList,
    pub last_names: GenderedList,
}

impl NameCorpus {
    /// Shared instance of the built-in corpus.
    pub fn builtin() -> Arc<NameCorpus> {
        static CORPUS: OnceLock<Arc<NameCorpus>> = OnceLock::new();
        Arc::clone(CORPUS.get_or_init(|| {
            Arc::new(NameCorpus {
                titles: GenderedList::new(DEFAULT_TITLES_MALE, DEFAULT_TITLES_FEMALE),
                first_names: GenderedList::new(
                    DEFAULT_FIRST_NAMES_MALE,
                    DEFAULT_FIRST_NAMES_FEMALE,
                ),
                middle_names: GenderedList::new(
                    DEFAULT_MIDDLE_NAMES_MALE,
                    DEFAULT_MIDDLE_NAMES_FEMALE,
                ),
                last_names: GenderedList::new(DEFAULT_LAST_NAMES, DEFAULT_LAST_NAMES),
            })
        }))
    }

    pub fn list(&self, list: NameList, gender: Gender) -> &[String] {
        let lists = match list {
            NameList::Title => &self.titles,
            NameList::FirstName => &self.first_names,
            NameList::MiddleName => &self.middle_names,
            NameList::LastName => &self.last_names,
        };
        lists.for_gender(gender)
    }

    /// Longest list for `list` across `genders`.
    pub fn max_len(&self, list: NameList, genders: &[Gender]) -> usize {
        genders
            .iter()
            .map(|gender| self.list(list, *gender).len())
            .max()
            .unwrap_or(0)
    }

    /// Longest entry, in characters, for `list` across `genders`.
    pub fn max_chars(&self, list: NameList, genders: &[Gender]) -> usize {
        genders
            .iter()
            .flat_map(|gender| self.list(list, *gender))
            .map(|value| value.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Every list reachable under `genders` must be non-empty.
    pub fn validate(&self, genders: &[Gender]) -> Result<(), ConfigurationError> {
        for gender in genders {
            for list in NameList::ALL {
                if self.list(list, *gender).is_empty() {
                    return Err(ConfigurationError::EmptyCorpus {
                        list: list.as_str(),
                        gender: *gender,
                    });
                }
            }
        }
        Ok(())
    }
}
