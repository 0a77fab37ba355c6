//! # Avaliador de Perceptron Médio
//!
//! Na inferência, um perceptron médio é só uma tabela esparsa de pesos:
//! para cada string de contexto ativa, soma-se o peso associado a cada
//! outcome candidato, e vence o outcome de maior score. O treinamento (e a
//! média dos pesos) acontece fora deste crate — aqui o modelo é um artefato
//! somente-leitura carregado uma vez na inicialização.
//!
//! ## Formato do artefato
//!
//! JSON com a lista de outcomes e, por predicado (string de contexto), as
//! linhas esparsas `(índice do outcome, peso)`:
//!
//! ```json
//! {
//!   "outcomes": ["O", "B", "I"],
//!   "parameters": { "NNP": [[1, 1.5], [2, 0.5]] }
//! }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ResourceError;

/// Modelo linear esparso avaliado por produto escalar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerceptronModel {
    /// Rótulos de saída possíveis; o índice de cada outcome é estável.
    outcomes: Vec<String>,
    /// Peso por (string de contexto, índice de outcome).
    parameters: HashMap<String, Vec<(usize, f64)>>,
}

impl PerceptronModel {
    pub fn new(outcomes: Vec<String>) -> Self {
        Self {
            outcomes,
            parameters: HashMap::new(),
        }
    }

    /// Carrega e valida um modelo serializado. Qualquer falha é fatal.
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let file = File::open(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: PerceptronModel =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                ResourceError::Json {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        model.validate()?;
        info!(
            outcomes = model.outcomes.len(),
            predicates = model.parameters.len(),
            path = %path.display(),
            "modelo perceptron carregado"
        );
        Ok(model)
    }

    /// Invariantes do artefato: ao menos um outcome, índices dentro do
    /// intervalo. Violação é erro de carga, nunca de avaliação.
    fn validate(&self) -> Result<(), ResourceError> {
        if self.outcomes.is_empty() {
            return Err(ResourceError::MalformedModel(
                "lista de outcomes vazia".to_string(),
            ));
        }
        for (predicate, row) in &self.parameters {
            for (index, _) in row {
                if *index >= self.outcomes.len() {
                    return Err(ResourceError::MalformedModel(format!(
                        "predicado '{predicate}' referencia outcome {index} \
                         fora do intervalo 0..{}",
                        self.outcomes.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Define um peso, registrando o outcome se ainda não existir.
    ///
    /// Usado pela construção de modelos de demonstração e por testes; um
    /// artefato treinado de verdade chega via [`PerceptronModel::load`].
    pub fn set_weight(&mut self, predicate: &str, outcome: &str, weight: f64) {
        let index = match self.outcomes.iter().position(|o| o == outcome) {
            Some(index) => index,
            None => {
                self.outcomes.push(outcome.to_string());
                self.outcomes.len() - 1
            }
        };
        let row = self.parameters.entry(predicate.to_string()).or_default();
        match row.iter_mut().find(|(i, _)| *i == index) {
            Some(entry) => entry.1 += weight,
            None => row.push((index, weight)),
        }
    }

    /// Avalia o contexto: um score por outcome, na ordem de `outcomes`.
    ///
    /// A avaliação é total — contextos sem nenhum predicado conhecido
    /// produzem scores zero, nunca erro.
    pub fn eval(&self, context: &[String]) -> Vec<f64> {
        let mut scores = vec![0.0; self.outcomes.len()];
        for predicate in context {
            if let Some(row) = self.parameters.get(predicate) {
                for (index, weight) in row {
                    scores[*index] += weight;
                }
            }
        }
        scores
    }

    /// Índice do outcome de maior score (o primeiro, em caso de empate).
    pub fn best_outcome_index(&self, scores: &[f64]) -> usize {
        let mut best = 0;
        for (index, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = index;
            }
        }
        best
    }

    /// Rótulo do outcome de maior score.
    pub fn best_outcome(&self, scores: &[f64]) -> &str {
        &self.outcomes[self.best_outcome_index(scores)]
    }

    pub fn outcome_index(&self, outcome: &str) -> Option<usize> {
        self.outcomes.iter().position(|o| o == outcome)
    }

    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_eval_sums_weights_per_outcome() {
        let mut model = PerceptronModel::new(strings(&["O", "B", "I"]));
        model.set_weight("NNP", "B", 1.5);
        model.set_weight("NNP", "I", 0.5);
        model.set_weight("Windows", "B", 1.0);

        let scores = model.eval(&strings(&["NNP", "Windows"]));
        assert_eq!(scores, vec![0.0, 2.5, 0.5]);
        assert_eq!(model.best_outcome(&scores), "B");
    }

    #[test]
    fn test_unknown_predicates_score_zero() {
        let model = PerceptronModel::new(strings(&["O", "B"]));
        let scores = model.eval(&strings(&["nada", "conhecido"]));
        assert_eq!(scores, vec![0.0, 0.0]);
        // empate → primeiro outcome
        assert_eq!(model.best_outcome(&scores), "O");
    }

    #[test]
    fn test_set_weight_registers_new_outcome() {
        let mut model = PerceptronModel::new(strings(&["O"]));
        model.set_weight("CD", "sw.version", 2.0);
        assert_eq!(model.outcome_index("sw.version"), Some(1));

        let scores = model.eval(&strings(&["CD"]));
        assert_eq!(model.best_outcome(&scores), "sw.version");
        assert_eq!(scores[1], 2.0);
    }

    #[test]
    fn test_json_round_trip_and_validation() {
        let mut model = PerceptronModel::new(strings(&["O", "B"]));
        model.set_weight("word", "B", 1.0);

        let json = serde_json::to_string(&model).unwrap();
        let parsed: PerceptronModel = serde_json::from_str(&json).unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.eval(&strings(&["word"])), vec![0.0, 1.0]);

        // outcomes vazios são um artefato malformado
        let empty = PerceptronModel::new(vec![]);
        assert!(matches!(
            empty.validate(),
            Err(ResourceError::MalformedModel(_))
        ));
    }
}
