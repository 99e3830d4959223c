use crate::analysis::{Phase, PhaseEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressPhase {
    Parsing,
    Registration,
    Resolution,
}

impl ProgressPhase {
    pub fn label(&self) -> &'static str {
        match self {
            ProgressPhase::Parsing => "Parsing files",
            ProgressPhase::Registration => "Registering symbols",
            ProgressPhase::Resolution => "Resolving references",
        }
    }
}

#[derive(Clone, Debug)]
pub enum ProgressMessage {
    Started {
        phase: ProgressPhase,
        total: usize,
    },
    Progress {
        phase: ProgressPhase,
        file: Option<String>,
    },
    Finished {
        phase: ProgressPhase,
    },
    Skipped(String),
    Exit,
}

impl From<Phase> for ProgressPhase {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Registration => ProgressPhase::Registration,
            Phase::Resolution => ProgressPhase::Resolution,
        }
    }
}

impl From<PhaseEvent> for ProgressMessage {
    fn from(event: PhaseEvent) -> Self {
        match event {
            PhaseEvent::Started { phase, files } => ProgressMessage::Started {
                phase: phase.into(),
                total: files,
            },
            PhaseEvent::Finished { phase } => ProgressMessage::Finished { phase: phase.into() },
        }
    }
}
