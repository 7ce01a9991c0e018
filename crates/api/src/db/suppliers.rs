//! Database operations for suppliers and their product links.

use sqlx::PgPool;

use tradepost_core::{SupplierId, SupplierProductId};

use super::RepositoryError;
use crate::models::supplier::{
    CreateSupplierInput, LinkSupplierProductInput, Supplier, SupplierProduct, UpdateSupplierInput,
};

const SUPPLIER_COLUMNS: &str = "supplier_id, name, debtor_type, contact_person, email, phone, \
     payment_terms, credit_limit, is_active, created_at, updated_at";

const LINK_COLUMNS: &str = "supplier_product_id, supplier_id, product_id, supplier_sku, \
     supplier_price, lead_time_days, minimum_order_quantity, is_preferred, created_at, updated_at";

/// Repository for supplier database operations.
pub struct SupplierRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SupplierRepository<'a> {
    /// Create a new supplier repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new supplier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &CreateSupplierInput) -> Result<Supplier, RepositoryError> {
        let sql = format!(
            "INSERT INTO suppliers
                 (name, debtor_type, contact_person, email, phone, payment_terms, credit_limit)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {SUPPLIER_COLUMNS}"
        );
        let supplier = sqlx::query_as::<_, Supplier>(&sql)
            .bind(&input.name)
            .bind(input.debtor_type)
            .bind(input.contact_person.as_deref())
            .bind(input.email.as_ref().map(tradepost_core::Email::as_str))
            .bind(input.phone.as_deref())
            .bind(input.payment_terms.as_deref())
            .bind(input.credit_limit)
            .fetch_one(self.pool)
            .await?;
        Ok(supplier)
    }

    /// List suppliers, optionally filtered on active status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, is_active: Option<bool>) -> Result<Vec<Supplier>, RepositoryError> {
        let sql = format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers
             WHERE ($1::bool IS NULL OR is_active = $1)
             ORDER BY supplier_id"
        );
        let rows = sqlx::query_as::<_, Supplier>(&sql)
            .bind(is_active)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Get a supplier by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SupplierId) -> Result<Option<Supplier>, RepositoryError> {
        let sql = format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE supplier_id = $1");
        let row = sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Update a supplier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the supplier doesn't exist.
    pub async fn update(
        &self,
        id: SupplierId,
        input: &UpdateSupplierInput,
    ) -> Result<Supplier, RepositoryError> {
        let sql = format!(
            "UPDATE suppliers
             SET name = COALESCE($2, name),
                 debtor_type = COALESCE($3, debtor_type),
                 contact_person = COALESCE($4, contact_person),
                 email = COALESCE($5, email),
                 phone = COALESCE($6, phone),
                 payment_terms = COALESCE($7, payment_terms),
                 credit_limit = COALESCE($8, credit_limit),
                 is_active = COALESCE($9, is_active)
             WHERE supplier_id = $1
             RETURNING {SUPPLIER_COLUMNS}"
        );
        sqlx::query_as::<_, Supplier>(&sql)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.debtor_type.map(|d| d.as_str()))
            .bind(input.contact_person.as_deref())
            .bind(input.email.as_ref().map(tradepost_core::Email::as_str))
            .bind(input.phone.as_deref())
            .bind(input.payment_terms.as_deref())
            .bind(input.credit_limit)
            .bind(input.is_active)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete a supplier by clearing `is_active`.
    ///
    /// # Returns
    ///
    /// Returns `true` if the supplier existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn soft_delete(&self, id: SupplierId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE suppliers SET is_active = FALSE WHERE supplier_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Link a product to a supplier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the pair is already linked,
    /// `RepositoryError::Invalid` when supplier or product do not exist.
    pub async fn link_product(
        &self,
        supplier_id: SupplierId,
        input: &LinkSupplierProductInput,
    ) -> Result<SupplierProduct, RepositoryError> {
        let sql = format!(
            "INSERT INTO supplier_products
                 (supplier_id, product_id, supplier_sku, supplier_price, lead_time_days,
                  minimum_order_quantity, is_preferred)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 1), COALESCE($7, FALSE))
             RETURNING {LINK_COLUMNS}"
        );
        sqlx::query_as::<_, SupplierProduct>(&sql)
            .bind(supplier_id)
            .bind(input.product_id)
            .bind(input.supplier_sku.as_deref())
            .bind(input.supplier_price)
            .bind(input.lead_time_days)
            .bind(input.minimum_order_quantity)
            .bind(input.is_preferred)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e {
                    if db_err.constraint() == Some("supplier_products_pair_key") {
                        return RepositoryError::Conflict(
                            "product already linked to this supplier".to_owned(),
                        );
                    }
                    if db_err.is_foreign_key_violation() {
                        return RepositoryError::Invalid(
                            "supplier or product does not exist".to_owned(),
                        );
                    }
                }
                RepositoryError::Database(e)
            })
    }

    /// List the products linked to a supplier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(
        &self,
        supplier_id: SupplierId,
    ) -> Result<Vec<SupplierProduct>, RepositoryError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM supplier_products
             WHERE supplier_id = $1
             ORDER BY supplier_product_id"
        );
        let rows = sqlx::query_as::<_, SupplierProduct>(&sql)
            .bind(supplier_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Remove a supplier/product link.
    ///
    /// # Returns
    ///
    /// Returns `true` if the link was removed, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unlink_product(
        &self,
        supplier_id: SupplierId,
        link_id: SupplierProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM supplier_products WHERE supplier_id = $1 AND supplier_product_id = $2",
        )
        .bind(supplier_id)
        .bind(link_id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
