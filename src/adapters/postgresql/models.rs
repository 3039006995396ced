//! PostgreSQL statement models
//!
//! SQL text and bind parameters for the four target tables. A bulk insert is one
//! multi-row `INSERT ... ON CONFLICT DO NOTHING` per chunk. Chunks are either as many
//! rows as fit under the protocol's bind-parameter limit or a power of two below it,
//! so each connection caches at most a handful of insert statements per table.

use crate::domain::{Entity, Row};
use tokio_postgres::types::ToSql;

/// Maximum bind parameters in one statement (the wire protocol uses a 16-bit count)
pub const MAX_BIND_PARAMS: usize = 65_535;

/// A borrowed bind parameter
pub type Param<'a> = &'a (dyn ToSql + Sync);

/// Rows of `entity` that fit in one statement
pub fn rows_per_chunk(entity: Entity) -> usize {
    MAX_BIND_PARAMS / entity.columns().len()
}

/// Splits `row_count` rows of `entity` into statement sizes
///
/// Full chunks first, then the binary decomposition of the remainder.
pub fn chunk_sizes(entity: Entity, row_count: usize) -> Vec<usize> {
    let max = rows_per_chunk(entity);
    let mut sizes = vec![max; row_count / max];
    let mut rest = row_count % max;
    while rest > 0 {
        let size = 1usize << (usize::BITS - 1 - rest.leading_zeros());
        sizes.push(size);
        rest -= size;
    }
    sizes
}

/// Multi-row insert for `row_count` rows of `entity`
///
/// Numeric columns are cast explicitly so `f64` parameters bind as `float8`.
pub fn insert_statement(entity: Entity, row_count: usize) -> String {
    let columns = entity.columns();
    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ",
        entity.table(),
        columns.join(", ")
    );

    let mut placeholder = 1usize;
    for row in 0..row_count {
        if row > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push('$');
            sql.push_str(&placeholder.to_string());
            if let Some(cast) = column_cast(column) {
                sql.push_str(cast);
            }
            placeholder += 1;
        }
        sql.push(')');
    }

    sql.push_str(" ON CONFLICT DO NOTHING");
    sql
}

fn column_cast(column: &str) -> Option<&'static str> {
    match column {
        "value" => Some("::float8"),
        _ => None,
    }
}

/// Point lookup of an internal id by source id
pub fn lookup_statement(entity: Entity) -> String {
    format!(
        "SELECT id FROM {} WHERE source_id = $1 LIMIT 1",
        entity.table()
    )
}

/// Appends the bind parameters of `row`, in [`Entity::columns`] order
pub fn push_params<'a>(row: &'a Row, params: &mut Vec<Param<'a>>) {
    match row {
        Row::Patient(r) => {
            let values: [Param<'a>; 8] = [
                &r.source_id,
                &r.birth_date,
                &r.gender,
                &r.race_code,
                &r.race_code_system,
                &r.ethnicity_code,
                &r.ethnicity_code_system,
                &r.country,
            ];
            params.extend(values);
        }
        Row::Encounter(r) => {
            let values: [Param<'a>; 6] = [
                &r.source_id,
                &r.patient_id,
                &r.start_date,
                &r.end_date,
                &r.type_code,
                &r.type_code_system,
            ];
            params.extend(values);
        }
        Row::Procedure(r) => {
            let values: [Param<'a>; 6] = [
                &r.source_id,
                &r.patient_id,
                &r.encounter_id,
                &r.procedure_date,
                &r.type_code,
                &r.type_code_system,
            ];
            params.extend(values);
        }
        Row::Observation(r) => {
            let values: [Param<'a>; 9] = [
                &r.source_id,
                &r.patient_id,
                &r.encounter_id,
                &r.observation_date,
                &r.type_code,
                &r.type_code_system,
                &r.value,
                &r.unit_code,
                &r.unit_code_system,
            ];
            params.extend(values);
        }
    }
}
