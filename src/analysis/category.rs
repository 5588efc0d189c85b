use std::{
    fmt::Display,
    ops::{Index, IndexMut},
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Top level bucket every event ends up in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum Category {
    Work,
    Study,
    Life,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Work, Category::Study, Category::Life];
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Work => write!(f, "Work"),
            Category::Study => write!(f, "Study"),
            Category::Life => write!(f, "Life"),
        }
    }
}

/// Holds one value per [Category]. The category set is fixed, so this is used instead of a map
/// to guarantee every category is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerCategory<T> {
    #[serde(rename = "Work")]
    pub work: T,
    #[serde(rename = "Study")]
    pub study: T,
    #[serde(rename = "Life")]
    pub life: T,
}

impl<T> PerCategory<T> {
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            work: f(Category::Work),
            study: f(Category::Study),
            life: f(Category::Life),
        }
    }

    /// Iterates in the declaration order of [Category].
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().map(move |c| (c, &self[c]))
    }
}

impl<T> Index<Category> for PerCategory<T> {
    type Output = T;

    fn index(&self, category: Category) -> &Self::Output {
        match category {
            Category::Work => &self.work,
            Category::Study => &self.study,
            Category::Life => &self.life,
        }
    }
}

impl<T> IndexMut<Category> for PerCategory<T> {
    fn index_mut(&mut self, category: Category) -> &mut Self::Output {
        match category {
            Category::Work => &mut self.work,
            Category::Study => &mut self.study,
            Category::Life => &mut self.life,
        }
    }
}

impl PerCategory<f64> {
    pub fn sum(&self) -> f64 {
        self.work + self.study + self.life
    }
}
