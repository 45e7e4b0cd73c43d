//! Sequencing of a full reconciliation run.
//!
//! A run validates the desired permissions, then reconciles the role's
//! attributes, its keyspace permissions and its memberships, in that
//! order. Each step reads fresh state, because an earlier step may have
//! created the role. Within a step every revoke is applied before any
//! grant.
//!
//! Runs assume they are the only writer touching this role.

use crate::{
    config::{RunConfig, Verbosity},
    desired::{DesiredRoleSpec, RoleState},
    error::ReconcileError,
    inspect::{PermissionInspector, RoleInspector},
    log_runtime,
    logging::{debug, error, info},
    permissions,
    reconcile::{attributes, membership, StatementPlan},
    report::{Diagnostics, RunReport},
    session::{ReadSession, WriteSession},
};

/// Drives the reconcilers against a pair of sessions.
pub struct Orchestrator<'a, R: ?Sized, W: ?Sized> {
    reader: &'a R,
    writer: &'a W,
    config: RunConfig,
}

impl<'a, R, W> Orchestrator<'a, R, W>
where
    R: ReadSession + ?Sized,
    W: WriteSession + ?Sized,
{
    /// Create an orchestrator. The sessions should already be bound to
    /// `config.consistency_level.for_reads()` and `.for_writes()`.
    pub fn new(reader: &'a R, writer: &'a W, config: RunConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Reconcile one role. Failures end up in [`RunReport::error`]
    /// alongside whatever was applied before them.
    pub async fn run(&self, desired: &DesiredRoleSpec) -> RunReport {
        let mut report = RunReport::new(desired.name.to_owned(), self.config.dry_run);
        if let Err(e) = self.try_run(desired, &mut report).await {
            error!("reconciling role {} failed: {e}", desired.name);
            report.error = Some(e);
        }
        report
    }

    async fn try_run(
        &self,
        desired: &DesiredRoleSpec,
        report: &mut RunReport,
    ) -> Result<(), ReconcileError> {
        // validate before touching the store
        let desired_permissions = desired
            .permissions
            .as_ref()
            .map(permissions::validate)
            .transpose()?;

        let role = &desired.name;
        let roles = RoleInspector::new(self.reader);

        let existed = roles.exists(role).await?;
        let current = if existed {
            roles.fetch_current(role).await?
        } else {
            None
        };
        let decision = attributes::reconcile(desired, current.as_ref());
        debug!(
            "role {role}: existed={existed}, decision={:?}",
            decision.as_ref().map(|d| d.action)
        );
        if self.config.verbosity == Verbosity::Debug {
            report.diagnostics = Some(Diagnostics {
                role_existed: existed,
                role_changed: decision.is_some(),
            });
        }
        if let Some(decision) = decision {
            report.changed = true;
            report.role_action = Some(decision.action);
            report.role_statement = Some(decision.redacted.clone());
            self.apply(&decision.statement, &decision.redacted, report).await?;
        }

        if desired.state == RoleState::Absent {
            return Ok(());
        }

        let grants = log_runtime!(
            "fetching grants",
            PermissionInspector::new(self.reader)
                .fetch_grants(role)
                .await?
        );
        let plan =
            crate::reconcile::permissions::reconcile(&grants, desired_permissions.as_ref(), role);
        report.revoked_permissions = plan.to_revoke.clone();
        report.granted_permissions = plan.to_grant.clone();
        self.apply_plan(&plan, report).await?;

        let memberships = log_runtime!(
            "fetching memberships",
            roles.fetch_memberships(role).await?
        );
        let plan = membership::reconcile(&memberships, desired.roles.as_ref(), role);
        report.revoked_roles = plan.to_revoke.clone();
        report.granted_roles = plan.to_grant.clone();
        self.apply_plan(&plan, report).await?;

        Ok(())
    }

    async fn apply_plan(
        &self,
        plan: &StatementPlan,
        report: &mut RunReport,
    ) -> Result<(), ReconcileError> {
        if plan.is_empty() {
            return Ok(());
        }
        report.changed = true;
        for statement in plan.ordered() {
            self.apply(statement, statement, report).await?;
        }
        Ok(())
    }

    /// Execute one statement through the write session, unless this is a
    /// dry run. Only `redacted` is logged or reported.
    async fn apply(
        &self,
        statement: &str,
        redacted: &str,
        report: &mut RunReport,
    ) -> Result<(), ReconcileError> {
        if self.config.dry_run {
            info!("dry run, not applying: {redacted}");
            return Ok(());
        }

        info!("applying: {redacted}");
        self.writer
            .execute_write(statement)
            .await
            .map_err(|e| ReconcileError::store(redacted.to_owned(), e))?;
        report.applied_statements.push(redacted.to_owned());
        Ok(())
    }
}
