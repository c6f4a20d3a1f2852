//! Turning entropy bytes into a person.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::errors::{ConfigurationError, GenerationError};
use crate::names::{NameCorpus, NameList};

/// Resolved gender of a generated person.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which genders a transformer may produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenderPolicy {
    Male,
    Female,
    Any,
}

impl GenderPolicy {
    pub const EXPECTED: &'static str = "Male, Female, Any";

    pub fn parse(param: &'static str, value: &str) -> Result<Self, ConfigurationError> {
        match value {
            "Male" => Ok(GenderPolicy::Male),
            "Female" => Ok(GenderPolicy::Female),
            "Any" => Ok(GenderPolicy::Any),
            other => Err(ConfigurationError::InvalidEnum {
                param,
                value: other.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }

    pub fn fixed(&self) -> Option<Gender> {
        match self {
            GenderPolicy::Male => Some(Gender::Male),
            GenderPolicy::Female => Some(Gender::Female),
            GenderPolicy::Any => None,
        }
    }

    pub fn reachable(&self) -> &'static [Gender] {
        match self {
            GenderPolicy::Male => &[Gender::Male],
            GenderPolicy::Female => &[Gender::Female],
            GenderPolicy::Any => &Gender::ALL,
        }
    }
}

impl From<Gender> for GenderPolicy {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => GenderPolicy::Male,
            Gender::Female => GenderPolicy::Female,
        }
    }
}

/// Placeholder-addressable fields of a [`Person`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersonField {
    Title,
    FirstName,
    MiddleName,
    LastName,
    Gender,
}

const FIELD_TABLE: [(&str, PersonField); 5] = [
    ("Title", PersonField::Title),
    ("FirstName", PersonField::FirstName),
    ("MiddleName", PersonField::MiddleName),
    ("LastName", PersonField::LastName),
    ("Gender", PersonField::Gender),
];

impl PersonField {
    pub const EXPECTED: &'static str = "Title, FirstName, MiddleName, LastName, Gender";

    pub fn from_name(name: &str) -> Option<Self> {
        FIELD_TABLE
            .iter()
            .find(|(field_name, _)| *field_name == name)
            .map(|(_, field)| *field)
    }

    pub fn name(&self) -> &'static str {
        FIELD_TABLE
            .iter()
            .find(|(_, field)| field == self)
            .map(|(name, _)| *name)
            .unwrap_or("Unknown")
    }

    /// Corpus list backing this field, if any.
    pub fn name_list(&self) -> Option<NameList> {
        match self {
            PersonField::Title => Some(NameList::Title),
            PersonField::FirstName => Some(NameList::FirstName),
            PersonField::MiddleName => Some(NameList::MiddleName),
            PersonField::LastName => Some(NameList::LastName),
            PersonField::Gender => None,
        }
    }
}

/// A generated person. Values borrow from the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Person<'a> {
    pub title: &'a str,
    pub first_name: &'a str,
    pub middle_name: &'a str,
    pub last_name: &'a str,
    pub gender: Gender,
}

impl<'a> Person<'a> {
    pub fn field(&self, field: PersonField) -> &'a str {
        match field {
            PersonField::Title => self.title,
            PersonField::FirstName => self.first_name,
            PersonField::MiddleName => self.middle_name,
            PersonField::LastName => self.last_name,
            PersonField::Gender => self.gender.as_str(),
        }
    }
}

/// Byte widths of the entropy slices, in consumption order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntropyLayout {
    gender: Option<usize>,
    components: [usize; 4],
}

impl EntropyLayout {
    pub fn new(corpus: &NameCorpus, genders: &[Gender], gender_slice: bool) -> Self {
        let mut components = [0_usize; 4];
        for (slot, list) in NameList::ALL.iter().enumerate() {
            components[slot] = slice_width(corpus.max_len(*list, genders));
        }
        Self {
            gender: gender_slice.then_some(1),
            components,
        }
    }

    pub fn has_gender_slice(&self) -> bool {
        self.gender.is_some()
    }

    /// Total entropy bytes one person consumes.
    pub fn len(&self) -> usize {
        self.gender.unwrap_or(0) + self.components.iter().sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Picks corpus entries from entropy.
#[derive(Debug, Clone)]
pub struct PersonSynthesizer {
    corpus: Arc<NameCorpus>,
    genders: Vec<Gender>,
    layout: EntropyLayout,
}

impl PersonSynthesizer {
    /// Validate `corpus` for `genders` and derive the entropy layout.
    ///
    /// `gender_slice` reserves the leading slice used to resolve `Any`.
    pub fn new(
        corpus: Arc<NameCorpus>,
        genders: &[Gender],
        gender_slice: bool,
    ) -> Result<Self, ConfigurationError> {
        corpus.validate(genders)?;
        let layout = EntropyLayout::new(&corpus, genders, gender_slice);
        Ok(Self {
            corpus,
            genders: genders.to_vec(),
            layout,
        })
    }

    pub fn corpus(&self) -> &NameCorpus {
        &self.corpus
    }

    pub fn genders(&self) -> &[Gender] {
        &self.genders
    }

    pub fn layout(&self) -> EntropyLayout {
        self.layout
    }

    pub fn entropy_len(&self) -> usize {
        self.layout.len()
    }

    pub fn synthesize(
        &self,
        entropy: &[u8],
        policy: GenderPolicy,
    ) -> Result<Person<'_>, GenerationError> {
        let required = self.layout.len();
        if entropy.len() < required {
            return Err(GenerationError::InsufficientEntropy {
                required,
                actual: entropy.len(),
            });
        }

        let mut offset = 0;
        let mut take = |width: usize| {
            let slice = &entropy[offset..offset + width];
            offset += width;
            read_index(slice)
        };

        let selector = self.layout.gender.map(&mut take);
        let gender = match policy.fixed() {
            Some(gender) => gender,
            None => match selector {
                Some(value) if value % 2 == 0 => Gender::Male,
                Some(_) => Gender::Female,
                None => return Err(GenerationError::MissingGenderSlice),
            },
        };
        if !self.genders.contains(&gender) {
            return Err(GenerationError::UnvalidatedGender(gender));
        }

        let mut picks = [""; 4];
        for (slot, list) in NameList::ALL.iter().enumerate() {
            let values = self.corpus.list(*list, gender);
            let index = take(self.layout.components[slot]) % values.len() as u64;
            picks[slot] = values[index as usize].as_str();
        }

        Ok(Person {
            title: picks[0],
            first_name: picks[1],
            middle_name: picks[2],
            last_name: picks[3],
            gender,
        })
    }
}

/// Bytes needed to address `max_len` entries, plus one.
fn slice_width(max_len: usize) -> usize {
    let mut width = 1;
    let mut capacity: u128 = 256;
    while capacity < max_len as u128 {
        width += 1;
        capacity *= 256;
    }
    (width + 1).min(8)
}

fn read_index(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte))
}
