use std::{fmt, str::FromStr};

use sea_orm::entity::prelude::*;

use crate::error::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// Minutes.
    pub duration: i32,
    pub age_rating: AgeRating,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::screening::Entity")]
    Screening,
}

impl Related<super::screening::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Screening.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum AgeRating {
    #[sea_orm(string_value = "0+")]
    Zero,
    #[sea_orm(string_value = "6+")]
    Six,
    #[sea_orm(string_value = "12+")]
    Twelve,
    #[sea_orm(string_value = "16+")]
    Sixteen,
    #[sea_orm(string_value = "18+")]
    Eighteen,
}

impl AgeRating {
    pub fn as_str(self) -> &'static str {
        match self {
            AgeRating::Zero => "0+",
            AgeRating::Six => "6+",
            AgeRating::Twelve => "12+",
            AgeRating::Sixteen => "16+",
            AgeRating::Eighteen => "18+",
        }
    }
}

impl fmt::Display for AgeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeRating {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0+" => Ok(AgeRating::Zero),
            "6+" => Ok(AgeRating::Six),
            "12+" => Ok(AgeRating::Twelve),
            "16+" => Ok(AgeRating::Sixteen),
            "18+" => Ok(AgeRating::Eighteen),
            other => Err(AppError::BadRequest(format!(
                "unknown age rating '{other}', expected one of 0+, 6+, 12+, 16+, 18+"
            ))),
        }
    }
}
