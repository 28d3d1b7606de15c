//! Supplier repository.
//!
//! Suppliers are master data referenced by purchase orders. They are never
//! deleted; deactivating one stops new orders from using it.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use docledger_core::ledger::{SupplierInput, validate_required_fields};
use docledger_core::workflow::{Action, Actor};
use docledger_shared::types::{ListPage, PageRequest, ReadOutcome};
use docledger_shared::{AppError, AppResult};

use super::LedgerContext;
use crate::coordinator::new_id;
use crate::entities::suppliers;
use crate::error::{storage_error, write_error};

/// Filter for listing suppliers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierFilter {
    /// Only active suppliers.
    #[serde(default)]
    pub active_only: bool,
}

/// Supplier repository.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    ctx: LedgerContext,
}

impl SupplierRepository {
    /// Creates a new supplier repository.
    #[must_use]
    pub const fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Lists suppliers ordered by code.
    pub async fn list(
        &self,
        filter: SupplierFilter,
        page: PageRequest,
    ) -> ReadOutcome<ListPage<suppliers::Model>> {
        let request = page.normalized();
        let query = async {
            let mut query = suppliers::Entity::find();
            if filter.active_only {
                query = query.filter(suppliers::Column::IsActive.eq(true));
            }

            let paginator = query
                .order_by_asc(suppliers::Column::Code)
                .paginate(self.ctx.db(), request.limit());
            let total = paginator.num_items().await.map_err(storage_error)?;
            let items = paginator
                .fetch_page(request.offset() / request.limit())
                .await
                .map_err(storage_error)?;
            Ok(ListPage::new(items, request, total))
        };

        self.ctx
            .reader
            .read("suppliers", query, || ListPage::empty(request))
            .await
    }

    /// Gets a supplier.
    pub async fn get(&self, id: Uuid) -> ReadOutcome<Option<suppliers::Model>> {
        let query = async {
            suppliers::Entity::find_by_id(id)
                .one(self.ctx.db())
                .await
                .map_err(storage_error)?
                .map(Some)
                .ok_or_else(|| not_found(id))
        };
        self.ctx.reader.read("supplier", query, || None).await
    }

    /// Registers an active supplier.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `Validation` for a missing field or a code already
    /// in use, or a storage error.
    pub async fn create(&self, actor: &Actor, input: &SupplierInput) -> AppResult<suppliers::Model> {
        self.ctx
            .policy
            .authorize(actor, Action::ManageSuppliers, None)?;
        validate_required_fields(input)?;

        let code = input.code.trim().to_string();
        let now = Utc::now().fixed_offset();
        let supplier = suppliers::ActiveModel {
            id: Set(new_id()),
            code: Set(code.clone()),
            name: Set(input.name.trim().to_string()),
            contact_name: Set(input.contact_name.clone()),
            phone: Set(input.phone.clone()),
            email: Set(input.email.clone()),
            address: Set(input.address.clone()),
            is_active: Set(true),
            created_by: Set(actor.id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.ctx.db())
        .await
        .map_err(|err| write_error(err, || format!("supplier code {code} is already in use")))?;

        info!(code = %supplier.code, "supplier created");
        Ok(supplier)
    }

    /// Activates or deactivates a supplier.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden`, `NotFound`, or a storage error.
    pub async fn set_active(
        &self,
        actor: &Actor,
        id: Uuid,
        active: bool,
    ) -> AppResult<suppliers::Model> {
        self.ctx
            .policy
            .authorize(actor, Action::ManageSuppliers, None)?;

        let supplier = suppliers::Entity::find_by_id(id)
            .one(self.ctx.db())
            .await
            .map_err(storage_error)?
            .ok_or_else(|| not_found(id))?;

        let mut model: suppliers::ActiveModel = supplier.into();
        model.is_active = Set(active);
        model.updated_at = Set(Utc::now().fixed_offset());
        let supplier = model.update(self.ctx.db()).await.map_err(storage_error)?;

        info!(code = %supplier.code, active, "supplier status changed");
        Ok(supplier)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("supplier {id} not found"))
}
