// src/db/finance_repo.rs

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::finance::{
        AccountPayload, CategoryPayload, ContactPayload, CostCenter, CostCenterPayload,
        FinancialAccount, FinancialCategory, FinancialContact, FinancialTransaction,
        PaymentType, TransactionFilters, TransactionPayload, TransactionStatus,
    },
};

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Apaga qualquer linha financeira da igreja; a tabela vem sempre de uma constante
    async fn delete_scoped(&self, table: &'static str, church_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND church_id = $2", table);
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(church_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  CONTAS (Caixa)
    // =========================================================================

    pub async fn list_accounts(&self, church_id: Uuid) -> Result<Vec<FinancialAccount>, AppError> {
        let accounts = sqlx::query_as::<_, FinancialAccount>(
            "SELECT * FROM financial_accounts WHERE church_id = $1 ORDER BY name ASC",
        )
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts)
    }

    // O saldo atual nasce igual ao saldo inicial
    pub async fn create_account(
        &self,
        church_id: Uuid,
        input: AccountPayload,
    ) -> Result<FinancialAccount, AppError> {
        let initial_balance = input.initial_balance.unwrap_or(Decimal::ZERO);
        let account = sqlx::query_as::<_, FinancialAccount>(
            r#"
            INSERT INTO financial_accounts (church_id, name, description, initial_balance, current_balance, is_active)
            VALUES ($1, $2, $3, $4, $4, COALESCE($5, TRUE))
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(input.name)
        .bind(input.description)
        .bind(initial_balance)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(account)
    }

    pub async fn update_account(
        &self,
        church_id: Uuid,
        account_id: Uuid,
        input: AccountPayload,
    ) -> Result<FinancialAccount, AppError> {
        sqlx::query_as::<_, FinancialAccount>(
            r#"
            UPDATE financial_accounts SET
                name = $3,
                description = $4,
                initial_balance = COALESCE($5, initial_balance),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1 AND church_id = $2
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(church_id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.initial_balance)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_account(&self, church_id: Uuid, account_id: Uuid) -> Result<(), AppError> {
        self.delete_scoped("financial_accounts", church_id, account_id).await
    }

    // =========================================================================
    //  CATEGORIAS (Plano de Contas)
    // =========================================================================

    pub async fn list_categories(&self, church_id: Uuid) -> Result<Vec<FinancialCategory>, AppError> {
        let categories = sqlx::query_as::<_, FinancialCategory>(
            "SELECT * FROM financial_categories WHERE church_id = $1 ORDER BY type, name ASC",
        )
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn create_category(
        &self,
        church_id: Uuid,
        input: CategoryPayload,
    ) -> Result<FinancialCategory, AppError> {
        let category = sqlx::query_as::<_, FinancialCategory>(
            r#"
            INSERT INTO financial_categories (church_id, name, type, color, description, is_active)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE))
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(input.name)
        .bind(input.kind)
        .bind(input.color)
        .bind(input.description)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn update_category(
        &self,
        church_id: Uuid,
        category_id: Uuid,
        input: CategoryPayload,
    ) -> Result<FinancialCategory, AppError> {
        sqlx::query_as::<_, FinancialCategory>(
            r#"
            UPDATE financial_categories SET
                name = $3,
                type = $4,
                color = $5,
                description = $6,
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1 AND church_id = $2
            RETURNING *
            "#,
        )
        .bind(category_id)
        .bind(church_id)
        .bind(input.name)
        .bind(input.kind)
        .bind(input.color)
        .bind(input.description)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_category(&self, church_id: Uuid, category_id: Uuid) -> Result<(), AppError> {
        self.delete_scoped("financial_categories", church_id, category_id).await
    }

    // =========================================================================
    //  CONTATOS (Fornecedores / Doadores)
    // =========================================================================

    pub async fn list_contacts(&self, church_id: Uuid) -> Result<Vec<FinancialContact>, AppError> {
        let contacts = sqlx::query_as::<_, FinancialContact>(
            "SELECT * FROM financial_contacts WHERE church_id = $1 ORDER BY name ASC",
        )
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(contacts)
    }

    pub async fn create_contact(
        &self,
        church_id: Uuid,
        input: ContactPayload,
    ) -> Result<FinancialContact, AppError> {
        let contact = sqlx::query_as::<_, FinancialContact>(
            r#"
            INSERT INTO financial_contacts (church_id, name, document, email, phone, phone2, address, notes, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, TRUE))
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(input.name)
        .bind(input.document)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.phone2)
        .bind(input.address)
        .bind(input.notes)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(contact)
    }

    pub async fn update_contact(
        &self,
        church_id: Uuid,
        contact_id: Uuid,
        input: ContactPayload,
    ) -> Result<FinancialContact, AppError> {
        sqlx::query_as::<_, FinancialContact>(
            r#"
            UPDATE financial_contacts SET
                name = $3,
                document = $4,
                email = $5,
                phone = $6,
                phone2 = $7,
                address = $8,
                notes = $9,
                is_active = COALESCE($10, is_active),
                updated_at = NOW()
            WHERE id = $1 AND church_id = $2
            RETURNING *
            "#,
        )
        .bind(contact_id)
        .bind(church_id)
        .bind(input.name)
        .bind(input.document)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.phone2)
        .bind(input.address)
        .bind(input.notes)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_contact(&self, church_id: Uuid, contact_id: Uuid) -> Result<(), AppError> {
        self.delete_scoped("financial_contacts", church_id, contact_id).await
    }

    // =========================================================================
    //  CENTROS DE CUSTO
    // =========================================================================

    pub async fn list_cost_centers(&self, church_id: Uuid) -> Result<Vec<CostCenter>, AppError> {
        let centers = sqlx::query_as::<_, CostCenter>(
            "SELECT * FROM cost_centers WHERE church_id = $1 ORDER BY name ASC",
        )
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(centers)
    }

    pub async fn create_cost_center(
        &self,
        church_id: Uuid,
        input: CostCenterPayload,
    ) -> Result<CostCenter, AppError> {
        let center = sqlx::query_as::<_, CostCenter>(
            r#"
            INSERT INTO cost_centers (church_id, name, description, is_active)
            VALUES ($1, $2, $3, COALESCE($4, TRUE))
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(center)
    }

    pub async fn update_cost_center(
        &self,
        church_id: Uuid,
        center_id: Uuid,
        input: CostCenterPayload,
    ) -> Result<CostCenter, AppError> {
        sqlx::query_as::<_, CostCenter>(
            r#"
            UPDATE cost_centers SET
                name = $3,
                description = $4,
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1 AND church_id = $2
            RETURNING *
            "#,
        )
        .bind(center_id)
        .bind(church_id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_cost_center(&self, church_id: Uuid, center_id: Uuid) -> Result<(), AppError> {
        self.delete_scoped("cost_centers", church_id, center_id).await
    }

    // =========================================================================
    //  LANÇAMENTOS
    // =========================================================================

    pub async fn list_transactions(
        &self,
        church_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<Vec<FinancialTransaction>, AppError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM financial_transactions WHERE church_id = ");
        query.push_bind(church_id);

        if let Some(kind) = filters.kind {
            query.push(" AND type = ").push_bind(kind);
        }
        if let Some(status) = filters.status {
            query.push(" AND status = ").push_bind(status);
        }
        query.push(" ORDER BY transaction_date DESC, created_at DESC");

        let transactions = query
            .build_query_as::<FinancialTransaction>()
            .fetch_all(&self.pool)
            .await?;
        Ok(transactions)
    }

    pub async fn create_transaction(
        &self,
        church_id: Uuid,
        created_by: Uuid,
        input: TransactionPayload,
    ) -> Result<FinancialTransaction, AppError> {
        let transaction = sqlx::query_as::<_, FinancialTransaction>(
            r#"
            INSERT INTO financial_transactions (
                church_id, type, description, amount, transaction_date, due_date, competency_date,
                status, payment_type, document_number, notes,
                account_id, category_id, contact_id, cost_center_id, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(input.kind)
        .bind(input.description)
        .bind(input.amount)
        .bind(input.transaction_date)
        .bind(input.due_date)
        .bind(input.competency_date)
        .bind(input.status.unwrap_or(TransactionStatus::Pending))
        .bind(input.payment_type.unwrap_or(PaymentType::Unico))
        .bind(input.document_number)
        .bind(input.notes)
        .bind(input.account_id)
        .bind(input.category_id)
        .bind(input.contact_id)
        .bind(input.cost_center_id)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(transaction)
    }

    pub async fn update_transaction(
        &self,
        church_id: Uuid,
        transaction_id: Uuid,
        input: TransactionPayload,
    ) -> Result<FinancialTransaction, AppError> {
        sqlx::query_as::<_, FinancialTransaction>(
            r#"
            UPDATE financial_transactions SET
                type = $3,
                description = $4,
                amount = $5,
                transaction_date = $6,
                due_date = $7,
                competency_date = $8,
                status = COALESCE($9, status),
                payment_type = COALESCE($10, payment_type),
                document_number = $11,
                notes = $12,
                account_id = $13,
                category_id = $14,
                contact_id = $15,
                cost_center_id = $16,
                updated_at = NOW()
            WHERE id = $1 AND church_id = $2
            RETURNING *
            "#,
        )
        .bind(transaction_id)
        .bind(church_id)
        .bind(input.kind)
        .bind(input.description)
        .bind(input.amount)
        .bind(input.transaction_date)
        .bind(input.due_date)
        .bind(input.competency_date)
        .bind(input.status)
        .bind(input.payment_type)
        .bind(input.document_number)
        .bind(input.notes)
        .bind(input.account_id)
        .bind(input.category_id)
        .bind(input.contact_id)
        .bind(input.cost_center_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_transaction(&self, church_id: Uuid, transaction_id: Uuid) -> Result<(), AppError> {
        self.delete_scoped("financial_transactions", church_id, transaction_id).await
    }
}
