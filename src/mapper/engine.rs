//! The structure mapper - copies same-named, compatible fields between records.
//!
//! Mapping runs in two phases. The plan phase walks the source fields in
//! declaration order and decides, for each one, which destination field it
//! lands in and what value gets stored. The apply phase writes the plan.
//! Nothing is written until both records have been validated and, under
//! [`MismatchPolicy::Fail`], until every field has been accepted.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Error, RecordRole, Result, SkipReason, SkippedField};
use crate::mapper::types::{MapReport, MapperConfig, MismatchPolicy, NameMatching};
use crate::record::{FieldDescriptor, Record};

/// Maps fields from a source record into a destination record.
///
/// The mapper holds only its configuration, so a single instance can be
/// shared across threads as long as each call gets its own destination.
#[derive(Debug, Clone, Default)]
pub struct StructMapper {
    config: MapperConfig,
}

impl StructMapper {
    /// Create a new mapper with the given configuration.
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Copy every source field that has a settable, type-compatible
    /// counterpart in `dst`.
    ///
    /// Fails with [`Error::AbsentRecord`] or [`Error::NotARecord`] if either
    /// argument is not a record, and with [`Error::FieldMismatch`] if the
    /// policy is [`MismatchPolicy::Fail`] and some field cannot be copied. In
    /// both cases `dst` is left untouched.
    pub fn map<D, S>(&self, dst: &mut D, src: &S) -> Result<MapReport>
    where
        D: Record + ?Sized,
        S: Record + ?Sized,
    {
        let source_fields = src
            .describe()
            .map_err(|e| e.into_error(RecordRole::Source))?;
        let dest_fields = dst
            .describe()
            .map_err(|e| e.into_error(RecordRole::Destination))?;

        let targets = Targets::new(dest_fields, self.config.name_matching);

        let mut plan: IndexMap<String, Value> = IndexMap::new();
        let mut report = MapReport::default();

        for field in &source_fields {
            match self.plan_field(&*dst, src, field, &targets, &plan) {
                Ok((target, value)) => {
                    plan.insert(target, value);
                }
                Err(reason) => {
                    if self.config.on_mismatch == MismatchPolicy::Fail {
                        return Err(Error::FieldMismatch {
                            field: field.name.clone(),
                            reason,
                        });
                    }
                    report.skipped.push(SkippedField {
                        name: field.name.clone(),
                        reason,
                    });
                }
            }
        }

        for (target, value) in plan {
            match dst.set_field(&target, value) {
                Ok(()) => report.copied.push(target),
                Err(reason) => report.skipped.push(SkippedField {
                    name: target,
                    reason,
                }),
            }
        }

        Ok(report)
    }

    /// Decide where a single source field goes and what gets stored there.
    fn plan_field<D, S>(
        &self,
        dst: &D,
        src: &S,
        field: &FieldDescriptor,
        targets: &Targets,
        plan: &IndexMap<String, Value>,
    ) -> std::result::Result<(String, Value), SkipReason>
    where
        D: Record + ?Sized,
        S: Record + ?Sized,
    {
        let target = targets
            .lookup(&field.name)
            .ok_or(SkipReason::NoSuchField)?;

        if plan.contains_key(&target.name) {
            return Err(SkipReason::AlreadyMapped {
                target: target.name.clone(),
            });
        }

        if !target.settable {
            return Err(SkipReason::NotSettable);
        }

        let value = src.get_field(&field.name).ok_or(SkipReason::Unreadable)?;
        let stored = dst.check_field(&target.name, &value, self.config.coerce_quoted_values)?;

        Ok((target.name.clone(), stored))
    }
}

/// Destination fields indexed for lookup by source field name.
///
/// A destination field with exactly the source name always wins. Otherwise
/// the match key decides, and the first destination field with a given key
/// is the target.
struct Targets {
    matching: NameMatching,
    by_name: IndexMap<String, FieldDescriptor>,
    by_key: IndexMap<String, String>,
}

impl Targets {
    fn new(fields: Vec<FieldDescriptor>, matching: NameMatching) -> Self {
        let mut by_name = IndexMap::with_capacity(fields.len());
        let mut by_key = IndexMap::with_capacity(fields.len());
        for field in fields {
            if let Some(key) = matching.key(&field.name) {
                by_key.entry(key).or_insert_with(|| field.name.clone());
            }
            by_name.entry(field.name.clone()).or_insert(field);
        }
        Self {
            matching,
            by_name,
            by_key,
        }
    }

    fn lookup(&self, name: &str) -> Option<&FieldDescriptor> {
        if let Some(exact) = self.by_name.get(name) {
            return Some(exact);
        }
        if self.matching == NameMatching::Exact {
            return None;
        }
        let key = self.matching.key(name)?;
        self.by_key
            .get(&key)
            .and_then(|target| self.by_name.get(target))
    }
}

/// Copy same-named, compatible fields from `src` into `dst` with the default
/// configuration (exact names, silent skip).
///
/// Field mismatches are skipped. Only invalid arguments fail.
pub fn map_structs<D, S>(dst: &mut D, src: &S) -> Result<()>
where
    D: Record + ?Sized,
    S: Record + ?Sized,
{
    StructMapper::default().map(dst, src).map(|_| ())
}
