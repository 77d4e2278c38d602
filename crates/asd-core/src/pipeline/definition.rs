//! Definición inmutable de un pipeline: el DAG de Steps validado.
//!
//! Toda definición inválida (ids duplicados, dependencia desconocida, ciclo)
//! se rechaza aquí, en construcción, nunca en tiempo de ejecución. El orden
//! topológico se calcula una sola vez con desempate por orden de
//! declaración, así dos corridas de la misma definición ejecutan en el mismo
//! orden.

use std::collections::HashMap;

use serde_json::json;

use crate::constants::PIPELINE_VERSION;
use crate::errors::PipelineError;
use crate::hashing::hash_value;
use crate::step::StepDefinition;

pub struct PipelineDefinition {
    name: String,
    steps: Vec<Box<dyn StepDefinition>>,
    /// Índice de declaración por id.
    index: HashMap<String, usize>,
    /// Orden topológico (índices de declaración).
    order: Vec<usize>,
    definition_hash: String,
}

impl std::fmt::Debug for PipelineDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineDefinition")
         .field("name", &self.name)
         .field("steps", &self.steps.iter().map(|s| s.id()).collect::<Vec<_>>())
         .field("order", &self.order)
         .field("definition_hash", &self.definition_hash)
         .finish()
    }
}

impl PipelineDefinition {
    /// Construye y valida la definición. Los steps se entregan en orden de
    /// declaración; ese orden desempata el orden topológico.
    pub fn new(name: impl Into<String>, steps: Vec<Box<dyn StepDefinition>>) -> Result<Self, PipelineError> {
        let name = name.into();
        if steps.is_empty() {
            return Err(PipelineError::EmptyDefinition);
        }

        let mut index: HashMap<String, usize> = HashMap::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            if index.insert(step.id().to_string(), i).is_some() {
                return Err(PipelineError::DuplicateStep(step.id().to_string()));
            }
        }
        for step in &steps {
            for dep in step.depends_on() {
                if !index.contains_key(dep) {
                    return Err(PipelineError::UnknownDependency { step: step.id().to_string(),
                                                                  dependency: dep.to_string() });
                }
            }
        }

        let order = topological_order(&steps, &index)?;
        let definition_hash = hash_definition(&name, &steps);

        Ok(Self { name,
                  steps,
                  index,
                  order,
                  definition_hash })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }

    /// Step por índice de declaración.
    pub fn step_at(&self, index: usize) -> &dyn StepDefinition {
        self.steps[index].as_ref()
    }

    pub fn step(&self, id: &str) -> Option<&dyn StepDefinition> {
        self.index.get(id).map(|&i| self.steps[i].as_ref())
    }

    /// Steps en orden de declaración.
    pub fn steps(&self) -> impl Iterator<Item = &dyn StepDefinition> {
        self.steps.iter().map(|s| s.as_ref())
    }

    /// Índices de declaración en orden topológico estable.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Ids en orden de ejecución. Útil en reportes y tests.
    pub fn order_ids(&self) -> Vec<&str> {
        self.order.iter().map(|&i| self.steps[i].id()).collect()
    }

    /// Restringe la definición a la clausura de dependencias de `target`,
    /// preservando el orden de declaración. Es el pipeline de una tarea
    /// individual: sus prerequisitos ya satisfechos on-chain completan por
    /// probe sin enviar transacciones.
    pub fn restricted_to(self, target: &str) -> Result<Self, PipelineError> {
        let Some(&target_idx) = self.index.get(target) else {
            return Err(PipelineError::UnknownStep(target.to_string()));
        };

        let mut keep = vec![false; self.steps.len()];
        let mut stack = vec![target_idx];
        while let Some(i) = stack.pop() {
            if keep[i] {
                continue;
            }
            keep[i] = true;
            for dep in self.steps[i].depends_on() {
                stack.push(self.index[dep]);
            }
        }

        let name = self.name;
        let steps: Vec<Box<dyn StepDefinition>> = self.steps
                                                      .into_iter()
                                                      .enumerate()
                                                      .filter_map(|(i, s)| keep[i].then_some(s))
                                                      .collect();
        Self::new(name, steps)
    }
}

/// Kahn con desempate por índice de declaración: en cada vuelta se emite el
/// step listo de menor índice. Si quedan steps sin emitir hay un ciclo.
fn topological_order(steps: &[Box<dyn StepDefinition>],
                     index: &HashMap<String, usize>)
                     -> Result<Vec<usize>, PipelineError> {
    let n = steps.len();
    let mut indegree = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, step) in steps.iter().enumerate() {
        for dep in step.depends_on() {
            indegree[i] += 1;
            dependents[index[dep]].push(i);
        }
    }

    let mut emitted = vec![false; n];
    let mut order = Vec::with_capacity(n);
    while order.len() < n {
        let next = (0..n).find(|&i| !emitted[i] && indegree[i] == 0);
        let Some(i) = next else {
            let remaining: Vec<String> = (0..n).filter(|&i| !emitted[i])
                                               .map(|i| steps[i].id().to_string())
                                               .collect();
            return Err(PipelineError::DependencyCycle(remaining));
        };
        emitted[i] = true;
        order.push(i);
        for &d in &dependents[i] {
            indegree[d] -= 1;
        }
    }
    Ok(order)
}

fn hash_definition(name: &str, steps: &[Box<dyn StepDefinition>]) -> String {
    let step_entries: Vec<serde_json::Value> = steps.iter()
                                                  .map(|s| {
                                                      json!({
                                                          "id": s.id(),
                                                          "depends_on": s.depends_on(),
                                                      })
                                                  })
                                                  .collect();
    hash_value(&json!({
                   "pipeline": name,
                   "version": PIPELINE_VERSION,
                   "steps": step_entries,
               }))
}
