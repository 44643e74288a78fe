//! PostgreSQL `DatabaseServiceProvider` built on sqlx.
//!
//! Jobs live in `nfvo_job` with their history in `nfvo_job_status`, keyed by
//! `(job_id, sequence)`. A job write runs in one transaction: the
//! compare-and-swap on `version` first, then a single multi-row insert of
//! the history entries past the stored count. Occurrence state updates are a single conditional `UPDATE` whose
//! `WHERE` clause encodes the occurrence transition table.

use super::errors::{StorageError, StorageResult};
use super::provider::DatabaseServiceProvider;
use crate::models::{JobAction, NfvoJob, NfvoJobStatus, NfvoNsInst, NsLcmOpOcc};
use crate::state_machine::{JobStatus, NsInstanceState, OperationState, OperationStateMachine};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

/// Schema migrations bundled from `migrations/`
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Clone)]
pub struct PgDatabaseServiceProvider {
    pool: PgPool,
}

impl PgDatabaseServiceProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn load_history(&self, job_id: &str) -> StorageResult<Vec<NfvoJobStatus>> {
        let rows = sqlx::query(
            "SELECT status, description, updated_time FROM nfvo_job_status \
             WHERE job_id = $1 ORDER BY sequence",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> StorageResult<NfvoJobStatus> {
                let status: String = row.try_get("status")?;
                Ok(NfvoJobStatus {
                    status: parse_column("job", job_id, &status)?,
                    description: row.try_get("description")?,
                    updated_time: row.try_get("updated_time")?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl DatabaseServiceProvider for PgDatabaseServiceProvider {
    async fn add_job(&self, job: &NfvoJob) -> StorageResult<i64> {
        let mut tx = self.pool.begin().await?;

        let new_version = if job.version == 0 {
            let result = sqlx::query(
                "INSERT INTO nfvo_job (job_id, job_type, job_action, resource_id, resource_name, \
                 status, progress, process_instance_id, start_time, end_time, version) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 1) \
                 ON CONFLICT (job_id) DO NOTHING",
            )
            .bind(&job.job_id)
            .bind(&job.job_type)
            .bind(job.job_action.as_str())
            .bind(&job.resource_id)
            .bind(&job.resource_name)
            .bind(job.status.as_str())
            .bind(job.progress)
            .bind(&job.process_instance_id)
            .bind(job.start_time)
            .bind(job.end_time)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(conflict(job));
            }
            1
        } else {
            let updated: Option<i64> = sqlx::query_scalar(
                "UPDATE nfvo_job SET job_type = $2, resource_id = $3, resource_name = $4, \
                 status = $5, progress = $6, process_instance_id = $7, end_time = $8, \
                 version = version + 1 \
                 WHERE job_id = $1 AND version = $9 \
                 RETURNING version",
            )
            .bind(&job.job_id)
            .bind(&job.job_type)
            .bind(&job.resource_id)
            .bind(&job.resource_name)
            .bind(job.status.as_str())
            .bind(job.progress)
            .bind(&job.process_instance_id)
            .bind(job.end_time)
            .bind(job.version)
            .fetch_optional(&mut *tx)
            .await?;

            match updated {
                Some(version) => version,
                None => {
                    let exists: Option<i64> =
                        sqlx::query_scalar("SELECT version FROM nfvo_job WHERE job_id = $1")
                            .bind(&job.job_id)
                            .fetch_optional(&mut *tx)
                            .await?;
                    return Err(match exists {
                        Some(_) => conflict(job),
                        None => StorageError::not_found("job", job.job_id.clone()),
                    });
                }
            }
        };

        // The version check above serializes writers, so the stored count is stable
        let stored: i64 = if job.version == 0 {
            0
        } else {
            sqlx::query_scalar("SELECT COUNT(*) FROM nfvo_job_status WHERE job_id = $1")
                .bind(&job.job_id)
                .fetch_one(&mut *tx)
                .await?
        };
        let pending = usize::try_from(stored)
            .ok()
            .and_then(|stored| job.history().get(stored..))
            .unwrap_or_default();

        if !pending.is_empty() {
            let first_sequence = stored as i32;
            let sequences: Vec<i32> = (first_sequence..).take(pending.len()).collect();
            let statuses: Vec<&str> = pending.iter().map(|e| e.status.as_str()).collect();
            let descriptions: Vec<Option<String>> =
                pending.iter().map(|e| e.description.clone()).collect();
            let updated_times: Vec<DateTime<Utc>> =
                pending.iter().map(|e| e.updated_time).collect();

            sqlx::query(
                "INSERT INTO nfvo_job_status (job_id, sequence, status, description, updated_time) \
                 SELECT $1, * FROM UNNEST($2::int4[], $3::text[], $4::text[], $5::timestamptz[]) \
                 ON CONFLICT (job_id, sequence) DO NOTHING",
            )
            .bind(&job.job_id)
            .bind(&sequences)
            .bind(&statuses)
            .bind(&descriptions)
            .bind(&updated_times)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(
            job_id = %job.job_id,
            version = new_version,
            history_entries_written = pending.len(),
            "Persisted job"
        );

        Ok(new_version)
    }

    async fn get_job(&self, job_id: &str) -> StorageResult<Option<NfvoJob>> {
        let row = sqlx::query(
            "SELECT job_id, job_type, job_action, resource_id, resource_name, status, progress, \
             process_instance_id, start_time, end_time, version \
             FROM nfvo_job WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let history = self.load_history(job_id).await?;
        job_from_row(&row, history).map(Some)
    }

    async fn add_ns_instance(&self, ns_inst: &NfvoNsInst) -> StorageResult<()> {
        sqlx::query(
            "INSERT INTO nfvo_ns_inst (ns_inst_id, name, description, ns_package_id, status, \
             status_updated_time) VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (ns_inst_id) DO UPDATE SET name = EXCLUDED.name, \
             description = EXCLUDED.description, ns_package_id = EXCLUDED.ns_package_id, \
             status = EXCLUDED.status, status_updated_time = EXCLUDED.status_updated_time",
        )
        .bind(&ns_inst.ns_inst_id)
        .bind(&ns_inst.name)
        .bind(&ns_inst.description)
        .bind(&ns_inst.ns_package_id)
        .bind(ns_inst.status.as_str())
        .bind(ns_inst.status_updated_time)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_ns_instance(&self, ns_inst_id: &str) -> StorageResult<Option<NfvoNsInst>> {
        let row = sqlx::query(
            "SELECT ns_inst_id, name, description, ns_package_id, status, status_updated_time \
             FROM nfvo_ns_inst WHERE ns_inst_id = $1",
        )
        .bind(ns_inst_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| -> StorageResult<NfvoNsInst> {
            let status: String = row.try_get("status")?;
            Ok(NfvoNsInst {
                ns_inst_id: row.try_get("ns_inst_id")?,
                name: row.try_get("name")?,
                description: row.try_get("description")?,
                ns_package_id: row.try_get("ns_package_id")?,
                status: parse_column("ns_instance", ns_inst_id, &status)?,
                status_updated_time: row.try_get("status_updated_time")?,
            })
        })
        .transpose()
    }

    async fn update_ns_instance_state(
        &self,
        ns_inst_id: &str,
        state: NsInstanceState,
    ) -> StorageResult<bool> {
        let result = sqlx::query(
            "UPDATE nfvo_ns_inst SET status = $2, status_updated_time = $3 WHERE ns_inst_id = $1",
        )
        .bind(ns_inst_id)
        .bind(state.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn add_ns_lcm_op_occ(&self, occ: &NsLcmOpOcc) -> StorageResult<()> {
        let result = sqlx::query(
            "INSERT INTO ns_lcm_op_occ (id, ns_inst_id, operation, operation_state, \
             state_entered_time, start_time, is_auto_invocation) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (id) DO NOTHING",
        )
        .bind(&occ.id)
        .bind(&occ.ns_instance_id)
        .bind(occ.operation.as_str())
        .bind(occ.operation_state.as_str())
        .bind(occ.state_entered_time)
        .bind(occ.start_time)
        .bind(occ.is_auto_invocation)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::AlreadyExists {
                entity: "ns_lcm_op_occ",
                id: occ.id.clone(),
            });
        }
        Ok(())
    }

    async fn get_ns_lcm_op_occ(&self, occ_id: &str) -> StorageResult<Option<NsLcmOpOcc>> {
        let row = sqlx::query(
            "SELECT id, ns_inst_id, operation, operation_state, state_entered_time, start_time, \
             is_auto_invocation FROM ns_lcm_op_occ WHERE id = $1",
        )
        .bind(occ_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| -> StorageResult<NsLcmOpOcc> {
            let operation: String = row.try_get("operation")?;
            let operation_state: String = row.try_get("operation_state")?;
            Ok(NsLcmOpOcc {
                id: row.try_get("id")?,
                ns_instance_id: row.try_get("ns_inst_id")?,
                operation: parse_column("ns_lcm_op_occ", occ_id, &operation)?,
                operation_state: parse_column("ns_lcm_op_occ", occ_id, &operation_state)?,
                state_entered_time: row.try_get("state_entered_time")?,
                start_time: row.try_get("start_time")?,
                is_auto_invocation: row.try_get("is_auto_invocation")?,
            })
        })
        .transpose()
    }

    async fn update_ns_lcm_op_occ_operation_state(
        &self,
        occ_id: &str,
        state: OperationState,
    ) -> StorageResult<bool> {
        let allowed_sources: Vec<String> = OperationStateMachine::allowed_sources(state)
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        if allowed_sources.is_empty() {
            return Ok(false);
        }

        let result = sqlx::query(
            "UPDATE ns_lcm_op_occ SET operation_state = $2, state_entered_time = $4 \
             WHERE id = $1 AND operation_state = ANY($3)",
        )
        .bind(occ_id)
        .bind(state.as_str())
        .bind(&allowed_sources)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

fn conflict(job: &NfvoJob) -> StorageError {
    StorageError::ConcurrentConflict {
        entity: "job",
        id: job.job_id.clone(),
        expected_version: job.version,
    }
}

fn job_from_row(row: &PgRow, history: Vec<NfvoJobStatus>) -> StorageResult<NfvoJob> {
    let job_id: String = row.try_get("job_id")?;
    let job_action: String = row.try_get("job_action")?;
    let status: String = row.try_get("status")?;
    let start_time: DateTime<Utc> = row.try_get("start_time")?;

    Ok(NfvoJob::from_parts(
        job_id.clone(),
        row.try_get("job_type")?,
        parse_column::<JobAction>("job", &job_id, &job_action)?,
        row.try_get("resource_id")?,
        row.try_get("resource_name")?,
        parse_column::<JobStatus>("job", &job_id, &status)?,
        row.try_get("progress")?,
        row.try_get("process_instance_id")?,
        start_time,
        row.try_get("end_time")?,
        history,
        row.try_get("version")?,
    ))
}

fn parse_column<T>(entity: &'static str, id: &str, value: &str) -> StorageResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|err: T::Err| StorageError::InvalidData {
        entity,
        id: id.to_string(),
        reason: err.to_string(),
    })
}
