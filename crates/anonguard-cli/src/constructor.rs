use std::path::Path;

use anonguard_core::{
    columns::{ColumnSchema, ColumnType},
    rules::{DEFAULT_UNKNOWN_MARKERS, DEFAULT_UNKNOWN_TOKEN},
    AnonymizationPolicy, ColumnGeneralization, CsvTable, GeneralizationRule, Table,
};
use anyhow::{Context, Result};

use crate::{
    errors::ConfigError,
    parser::{resolve_path, Anonymization, Column, Config, Generalization},
};

fn construct_rule(generalization: &Generalization) -> Result<GeneralizationRule, ConfigError> {
    let missing = |parameter: &str| ConfigError::MissingParameter {
        rule: generalization.rule.clone(),
        column: generalization.column.clone(),
        parameter: parameter.to_string(),
    };
    match generalization.rule.as_str() {
        "truncate" => {
            let length = generalization.length.ok_or_else(|| missing("length"))?;
            let unknown = generalization
                .unknown
                .clone()
                .unwrap_or_else(|| DEFAULT_UNKNOWN_TOKEN.to_string());
            let markers = generalization.unknown_markers.clone().unwrap_or_else(|| {
                DEFAULT_UNKNOWN_MARKERS
                    .iter()
                    .map(|m| m.to_string())
                    .collect()
            });
            Ok(GeneralizationRule::Truncate {
                length,
                unknown,
                markers,
            })
        }
        "round" => {
            let decimals = generalization.decimals.ok_or_else(|| missing("decimals"))?;
            Ok(GeneralizationRule::Round { decimals })
        }
        other => Err(ConfigError::UnknownRule {
            rule: other.to_string(),
            column: generalization.column.clone(),
        }),
    }
}

/// Build the policy described by the `[anonymization]` and `[[generalization]]` sections.
pub fn construct_policy(
    anonymization: &Anonymization,
    generalizations: &[Generalization],
) -> Result<AnonymizationPolicy> {
    let mut builder = AnonymizationPolicy::builder(anonymization.k)
        .with_quasi_identifiers(anonymization.quasi_identifiers.clone())
        .drop_columns(anonymization.drop_columns.clone())
        .with_strict(anonymization.strict);

    for generalization in generalizations {
        let rule = construct_rule(generalization)?;
        builder = builder.with_generalization(
            ColumnGeneralization::new(&generalization.column, rule)
                .superseding(generalization.supersedes.clone()),
        );
    }
    builder.build().context("Invalid anonymization policy")
}

fn construct_column(column: &Column) -> Result<ColumnSchema, ConfigError> {
    let column_type =
        ColumnType::try_from(column.datatype.as_str()).map_err(|datatype| {
            ConfigError::UnknownDatatype {
                datatype,
                column: column.name.clone(),
            }
        })?;
    let column_type = match (column_type, &column.format) {
        (ColumnType::Date { .. }, Some(format)) => ColumnType::Date {
            format: format.clone(),
        },
        (_, Some(_)) => {
            return Err(ConfigError::UnexpectedFormat {
                column: column.name.clone(),
            })
        }
        (column_type, None) => column_type,
    };
    Ok(ColumnSchema::new(column.name.clone(), column_type))
}

/// Build the input table with its declared column types.
pub fn construct_csv_table(config: &Config, base_dir: &Path) -> Result<CsvTable> {
    let path = resolve_path(base_dir, &config.input.path);
    if !path.is_file() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let columns = config
        .column
        .iter()
        .map(construct_column)
        .collect::<Result<Vec<_>, _>>()?;

    let mut table = CsvTable::new(path, config.table_name());
    table
        .prepare(columns)
        .with_context(|| format!("Failed to prepare table: '{}'", table.name()))?;
    Ok(table)
}
