//! Display implementations for domain models.
//!
//! All output is markdown: a header per resource followed by a metadata list.

use std::fmt;

use super::datetime::{HumanDuration, LocalDateTime};
use crate::{
    models::{AttributeKey, Mission, MissionPhase, MissionSummary, TimeAwareEntity, TimeExtent},
    session::{DeleteOutcome, PhaseSnapshot},
};

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TimeExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            LocalDateTime(&self.start),
            LocalDateTime(&self.end)
        )
    }
}

impl fmt::Display for MissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.name)?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Time: {}", self.time_extent)?;
        writeln!(f, "- Duration: {}", HumanDuration(self.time_extent.duration()))
    }
}

impl TimeAwareEntity {
    fn fmt_heading(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {} ({})",
            self.symbol_code().unwrap_or("unknown symbol"),
            self.id
        )
    }
}

impl fmt::Display for TimeAwareEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_heading(f)?;
        writeln!(f)?;
        writeln!(f, "- Visible: {}", self.visible_time_extent)?;
        if let Some(control_points) = self.control_points() {
            writeln!(f, "- Position: `{control_points}`")?;
        }
        for attribute in self
            .attributes
            .iter()
            .filter(|attribute| attribute.key != AttributeKey::ControlPoints)
        {
            writeln!(f, "- {}: {}", attribute.key, attribute.value)?;
        }

        if !self.phase_control_points.is_empty() {
            writeln!(f)?;
            writeln!(f, "#### Positions by phase")?;
            writeln!(f)?;
            for (phase, control_points) in &self.phase_control_points {
                writeln!(f, "- {phase}: `{control_points}`")?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;
        writeln!(f, "- Phases: {}", self.phase_count())?;
        writeln!(f, "- Units: {}", self.entities.len())?;
        if let Some(extent) = self.time_extent() {
            writeln!(f, "- Time: {extent}")?;
        }

        if self.phases.is_empty() {
            return writeln!(f, "\nNo phases in this mission.");
        }

        writeln!(f, "\n## Phases")?;
        writeln!(f)?;
        for (index, phase) in self.phases.iter().enumerate() {
            let units = self.entities_visible_in(&phase.time_extent).count();
            writeln!(f, "{}. {} ({units} units)", index + 1, phase.name)?;
        }

        if !self.entities.is_empty() {
            writeln!(f, "\n## Units")?;
            writeln!(f)?;
            for entity in &self.entities {
                let code = entity.symbol_code().unwrap_or("unknown symbol");
                match self.phase_span(entity) {
                    Some((first, last)) => writeln!(
                        f,
                        "- {code} ({}): {} to {}",
                        entity.id, self.phases[first].name, self.phases[last].name
                    )?,
                    None => writeln!(f, "- {code} ({}): not in any phase", entity.id)?,
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for MissionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.name)?;
        writeln!(f)?;
        writeln!(
            f,
            "- **Phases**: {}, **Units**: {}",
            self.phase_count, self.entity_count
        )?;
        if let Some(extent) = &self.time_extent {
            writeln!(f, "- **Time**: {extent}")?;
        }
        writeln!(f, "- **Saved**: {}", LocalDateTime(&self.updated_at))?;
        writeln!(f)
    }
}

impl fmt::Display for PhaseSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# Phase {} of {}: {}",
            self.index + 1,
            self.phase_count,
            self.phase.name
        )?;
        writeln!(f)?;
        writeln!(f, "- Time: {}", self.phase.time_extent)?;

        if self.entities.is_empty() {
            return writeln!(f, "\nNo units in this phase.");
        }

        writeln!(f)?;
        for entity in &self.entities {
            entity.fmt_heading(f)?;
            writeln!(f)?;
            writeln!(f, "- Position: `{}`", entity.control_points().unwrap_or(""))?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteOutcome::Deleted => write!(f, "unit deleted"),
            DeleteOutcome::StartAdvanced { start } => {
                write!(f, "unit now starts at {}", LocalDateTime(start))
            }
            DeleteOutcome::EndRetracted { end } => {
                write!(f, "unit now ends at {}", LocalDateTime(end))
            }
            DeleteOutcome::Split { end, successor } => write!(
                f,
                "unit now ends at {}; later phases continue as unit {successor}",
                LocalDateTime(end)
            ),
        }
    }
}
