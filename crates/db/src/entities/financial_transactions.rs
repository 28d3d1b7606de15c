//! `SeaORM` Entity for financial_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "financial_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub number: String,
    pub transaction_date: Date,
    pub transaction_type: String,
    pub description: String,
    pub status: String,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub total: Decimal,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTimeWithTimeZone>,
    pub rejection_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::financial_transaction_lines::Entity")]
    FinancialTransactionLines,
}

impl Related<super::financial_transaction_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialTransactionLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
