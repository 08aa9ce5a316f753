use crate::{
    checkout::{can_submit, PayerDetails},
    config::{Config, ConfigManager},
    render::{format_due_date, render_plan},
    schedule::{Clock, Plan, PlanRequest, ScheduleGenerator, SystemClock},
};

use super::commands::{self, CommandRegistry};
use super::errors::{CliError, CommandError};
use super::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Mutable UI state owned by the shell. The schedule itself is always rebuilt
/// from `request`; nothing about the previous plan is reused.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub request: PlanRequest,
    pub plan: Plan,
    pub payer: PayerDetails,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_manager(mode, config_manager, &SystemClock)
    }

    pub fn with_manager(
        mode: CliMode,
        config_manager: ConfigManager,
        clock: &dyn Clock,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        let request = blank_request(&config, clock);
        let plan = Plan::empty(request.interval, request.interval_count);
        Ok(Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            config_manager,
            config,
            request,
            plan,
            payer: PayerDetails::default(),
            running: true,
        })
    }

    pub fn generator(&self) -> ScheduleGenerator {
        ScheduleGenerator::new(self.config.amount_precision)
    }

    /// Replaces the request and regenerates the plan from scratch.
    pub fn update_request(&mut self, request: PlanRequest) {
        self.request = request;
        self.plan = self.generator().generate(&self.request);
    }

    pub fn reset(&mut self, clock: &dyn Clock) {
        let request = blank_request(&self.config, clock);
        self.update_request(request);
        self.payer = PayerDetails::default();
    }

    pub fn submission_enabled(&self) -> bool {
        can_submit(&self.payer, &self.plan)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn persist_config(&self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub fn print_plan(&self) {
        output::section("Payment plan");
        if let Err(err) = self.generator().generate_checked(&self.request) {
            output::warning(err);
        }
        if self.plan.is_empty() {
            output::info("No charges scheduled.");
            return;
        }
        let options = self.config.display_options();
        let mut summary = format!(
            "{} charge(s), {}",
            self.plan.len(),
            self.plan.cadence().label()
        );
        if let Some(last) = self.plan.final_due_date() {
            summary.push_str(&format!(
                ", last due {}",
                format_due_date(last, options.date_style)
            ));
        }
        output::info(summary);
        for line in render_plan(&self.plan, &options) {
            output::charge_line(&line);
        }
    }

    pub fn report_error(&self, err: CommandError) {
        output::error(err);
    }

    pub fn prompt(&self) -> String {
        if self.plan.is_empty() {
            "plan> ".into()
        } else {
            format!("plan[{}]> ", self.plan.len())
        }
    }
}

fn blank_request(config: &Config, clock: &dyn Clock) -> PlanRequest {
    PlanRequest::starting_today(clock)
        .with_interval(config.default_interval, config.default_interval_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{FixedClock, PlanField, TimeUnit};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> ShellContext {
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        ShellContext::with_manager(CliMode::Script, manager, &clock).unwrap()
    }

    #[test]
    fn request_starts_from_config_defaults() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.set("default_interval", "week").unwrap();
        ConfigManager::with_base_dir(dir.path().to_path_buf())
            .unwrap()
            .save(&config)
            .unwrap();

        let context = context(&dir);
        assert_eq!(context.request.interval, TimeUnit::Week);
        assert!(context.plan.is_empty());
        assert_eq!(context.prompt(), "plan> ");
    }

    #[test]
    fn updating_request_regenerates_plan() {
        let dir = TempDir::new().unwrap();
        let mut context = context(&dir);
        let request = context
            .request
            .apply(PlanField::Total, "90")
            .and_then(|r| r.apply(PlanField::Installments, "3"))
            .unwrap();
        context.update_request(request);
        assert_eq!(context.plan.len(), 3);
        assert_eq!(context.prompt(), "plan[3]> ");

        context.payer = PayerDetails::new("Ada", "Lovelace", "ada@example.com");
        assert!(context.submission_enabled());

        let cleared = context.request.apply(PlanField::Installments, "0").unwrap();
        context.update_request(cleared);
        assert!(!context.submission_enabled());
    }
}
