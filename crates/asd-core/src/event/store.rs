use chrono::Utc;
use uuid::Uuid;

use super::{RunEvent, RunEventKind};

/// Log de eventos append-only de una corrida. Vive en memoria y muere con el
/// engine: ninguna corrida persiste estado.
#[derive(Default)]
pub struct EventLog {
    events: Vec<RunEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega un evento a partir de su kind y devuelve el evento completo
    /// (con seq y ts asignados).
    pub fn append_kind(&mut self, run_id: Uuid, kind: RunEventKind) -> &RunEvent {
        let ev = RunEvent { seq: self.events.len() as u64,
                            run_id,
                            kind,
                            ts: Utc::now() };
        self.events.push(ev);
        self.events.last().unwrap()
    }

    pub fn list(&self) -> &[RunEvent] {
        &self.events
    }

    /// Variante compacta de la secuencia de eventos, una letra por evento.
    /// Pensada para asserts de tests sobre el orden observado.
    pub fn variants(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .map(|e| match e.kind {
                RunEventKind::PipelineStarted { .. } => "P",
                RunEventKind::StepStarted { .. } => "S",
                RunEventKind::StepCompleted { .. } => "C",
                RunEventKind::StepFailed { .. } => "X",
                RunEventKind::StepSkipped { .. } => "K",
                RunEventKind::PipelineFinished { .. } => "F",
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_assigns_monotonic_seq() {
        let run_id = Uuid::new_v4();
        let mut log = EventLog::new();
        log.append_kind(run_id,
                        RunEventKind::PipelineStarted { pipeline: "p".into(),
                                                        plan_hash: "h".into(),
                                                        step_count: 1 });
        log.append_kind(run_id,
                        RunEventKind::PipelineFinished { succeeded: true,
                                                         cancelled: false });
        let seqs: Vec<u64> = log.list().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert_eq!(log.variants(), vec!["P", "F"]);
    }
}
