//! `SeaORM` Entity for financial_transaction_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "financial_transaction_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub financial_transaction_id: Uuid,
    pub line_number: i32,
    pub account_code: String,
    #[sea_orm(column_type = "Decimal(Some((20, 4)))")]
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::financial_transactions::Entity",
        from = "Column::FinancialTransactionId",
        to = "super::financial_transactions::Column::Id",
        on_delete = "Cascade"
    )]
    FinancialTransactions,
}

impl Related<super::financial_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
