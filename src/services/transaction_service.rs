//! Servicio de transacciones de compra
//!
//! Máquina de estados de la demanda de compra:
//! `pending -> confirmed` (vendedor) o `pending -> cancelled` (comprador,
//! vendedor o sweeper TTL). Cada operación corre primero el sweeper de su
//! dominio y después ejecuta una única sección crítica: bloquear el row del
//! vehículo, validar, mutar transacción y ledger juntos, commit. El rollback
//! implícito al dropear la transacción sqlx libera el lock en todo camino
//! de error.

use crate::models::transaction::Transaction;
use crate::repositories::transaction_repository::TransactionRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Resultado de una demanda de compra: la transacción y si fue creada
/// ahora o ya existía (idempotencia por comprador)
#[derive(Debug, Clone)]
pub struct PurchaseRequestResult {
    pub transaction: Transaction,
    pub created: bool,
}

pub struct TransactionService {
    pool: PgPool,
    repository: TransactionRepository,
    ttl_hours: i64,
}

impl TransactionService {
    /// `ttl_hours` llega de la configuración en el composition root;
    /// el core nunca lee estado global.
    pub fn new(pool: PgPool, ttl_hours: i64) -> Self {
        Self {
            repository: TransactionRepository::new(pool.clone()),
            pool,
            ttl_hours: ttl_hours.max(1),
        }
    }

    /// Cancela en bloque las demandas pendientes más viejas que el TTL y
    /// libera los vehículos reservados que quedaron sin demanda activa.
    /// Idempotente: una segunda pasada devuelve 0.
    pub async fn expire_stale_purchase_requests(
        &self,
        ttl_hours: Option<i64>,
    ) -> Result<u64, AppError> {
        let ttl = ttl_hours.unwrap_or(self.ttl_hours).max(1);
        let cutoff = Utc::now() - Duration::hours(ttl);

        let mut tx = self.pool.begin().await?;

        let vehicle_ids =
            TransactionRepository::stale_pending_vehicle_ids(&mut *tx, cutoff).await?;
        if vehicle_ids.is_empty() {
            return Ok(0);
        }

        let expired = TransactionRepository::cancel_stale_pending(&mut *tx, cutoff).await?;
        VehicleRepository::release_reserved_without_pending_transactions(&mut *tx, &vehicle_ids)
            .await?;

        tx.commit().await?;

        tracing::info!(expired, ttl_hours = ttl, "demandas de compra expiradas");
        Ok(expired)
    }

    /// Demanda de compra de un comprador sobre un anuncio aprobado.
    /// Idempotente por comprador: si ya tiene una demanda pendiente sobre el
    /// vehículo devuelve esa misma con `created = false`.
    pub async fn create_purchase_request(
        &self,
        vehicle_id: Uuid,
        buyer_id: Uuid,
    ) -> Result<PurchaseRequestResult, AppError> {
        self.expire_stale_purchase_requests(None).await?;

        let mut tx = self.pool.begin().await?;

        let vehicle = VehicleRepository::lock_by_id(&mut *tx, vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if !vehicle.is_approved() {
            return Err(AppError::InvalidState(
                "Este anuncio todavía no está validado".to_string(),
            ));
        }

        if vehicle.seller_id == buyer_id {
            return Err(AppError::Forbidden(
                "No puedes comprar tu propio vehículo".to_string(),
            ));
        }

        if vehicle.is_sold {
            return Err(AppError::AlreadySold(
                "Este vehículo ya no está disponible".to_string(),
            ));
        }

        if let Some(existing) = TransactionRepository::find_pending_by_vehicle_and_buyer(
            &mut *tx, vehicle_id, buyer_id,
        )
        .await?
        {
            tx.commit().await?;
            return Ok(PurchaseRequestResult {
                transaction: existing,
                created: false,
            });
        }

        if vehicle.is_reserved {
            return Err(AppError::AlreadyReserved(
                "Este vehículo ya está reservado".to_string(),
            ));
        }

        // Snapshot del precio al momento de la demanda
        let trx = TransactionRepository::insert_pending(
            &mut *tx,
            vehicle_id,
            buyer_id,
            vehicle.seller_id,
            vehicle.price,
        )
        .await?;

        VehicleRepository::set_reserved(&mut *tx, vehicle_id, true).await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = %trx.id,
            vehicle_id = %vehicle_id,
            "demanda de compra creada, vehículo reservado"
        );

        Ok(PurchaseRequestResult {
            transaction: trx,
            created: true,
        })
    }

    /// Anulación por el comprador de su demanda pendiente
    pub async fn cancel_purchase_request(
        &self,
        transaction_id: Uuid,
        buyer_id: Uuid,
    ) -> Result<Transaction, AppError> {
        self.expire_stale_purchase_requests(None).await?;

        let trx = self
            .repository
            .find_pending_for_buyer(transaction_id, buyer_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Demanda de compra pendiente no encontrada".to_string())
            })?;

        self.retire_pending(trx).await
    }

    /// Refus por el vendedor de una demanda pendiente
    pub async fn refuse_purchase_request(
        &self,
        transaction_id: Uuid,
        seller_id: Uuid,
    ) -> Result<Transaction, AppError> {
        self.expire_stale_purchase_requests(None).await?;

        let trx = self
            .repository
            .find_pending_for_seller(transaction_id, seller_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Demanda de compra pendiente no encontrada".to_string())
            })?;

        self.retire_pending(trx).await
    }

    /// Camino común de cancel/refuse: cancela bajo lock y libera la reserva
    /// solo si no queda otra demanda pendiente sobre el vehículo.
    async fn retire_pending(&self, trx: Transaction) -> Result<Transaction, AppError> {
        let mut tx = self.pool.begin().await?;

        VehicleRepository::lock_by_id(&mut *tx, trx.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let updated = TransactionRepository::mark_cancelled(&mut *tx, trx.id).await?;
        if updated == 0 {
            // Otro actor (o el sweeper) la retiró entre el lookup y el lock
            return Err(AppError::NotFound(
                "Demanda de compra pendiente no encontrada".to_string(),
            ));
        }

        let still_pending =
            TransactionRepository::exists_pending_for_vehicle(&mut *tx, trx.vehicle_id, None)
                .await?;
        if !still_pending {
            VehicleRepository::set_reserved(&mut *tx, trx.vehicle_id, false).await?;
        }

        tx.commit().await?;

        tracing::info!(transaction_id = %trx.id, "demanda de compra cancelada");

        self.repository
            .find_by_id(trx.id)
            .await?
            .ok_or_else(|| AppError::Internal("Transacción desaparecida tras cancelar".to_string()))
    }

    /// Confirmación de venta por el vendedor. Marca el vehículo como vendido
    /// (estado terminal) y retira, en la misma transacción SQL, todas las
    /// demandas rivales pendientes: nunca dos ventas confirmadas por vehículo.
    pub async fn confirm_sale(
        &self,
        transaction_id: Uuid,
        seller_id: Uuid,
    ) -> Result<Transaction, AppError> {
        self.expire_stale_purchase_requests(None).await?;

        let trx = self
            .repository
            .find_pending_for_seller(transaction_id, seller_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Demanda de compra pendiente no encontrada".to_string())
            })?;

        let mut tx = self.pool.begin().await?;

        VehicleRepository::lock_by_id(&mut *tx, trx.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let now = Utc::now();
        let updated = TransactionRepository::mark_confirmed(&mut *tx, trx.id, now).await?;
        if updated == 0 {
            return Err(AppError::NotFound(
                "Demanda de compra pendiente no encontrada".to_string(),
            ));
        }

        VehicleRepository::mark_sold(&mut *tx, trx.vehicle_id).await?;
        let retired =
            TransactionRepository::cancel_other_pending(&mut *tx, trx.vehicle_id, trx.id, now)
                .await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = %trx.id,
            vehicle_id = %trx.vehicle_id,
            rival_requests_cancelled = retired,
            "venta confirmada"
        );

        self.repository
            .find_by_id(trx.id)
            .await?
            .ok_or_else(|| AppError::Internal("Transacción desaparecida tras confirmar".to_string()))
    }

    /// Historial de compras del usuario
    pub async fn purchases_of(&self, buyer_id: Uuid) -> Result<Vec<Transaction>, AppError> {
        self.repository.list_by_buyer(buyer_id).await
    }

    /// Historial de ventas del usuario
    pub async fn sales_of(&self, seller_id: Uuid) -> Result<Vec<Transaction>, AppError> {
        self.repository.list_by_seller(seller_id).await
    }
}
