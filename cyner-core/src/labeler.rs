//! # Rotulador Sequencial Guloso em Dois Estágios
//!
//! Uma máquina de estados por sentença, executada estritamente da esquerda
//! para a direita — sem retrocesso e sem busca global (Viterbi):
//!
//! - **Estágio A (I-O-B)**: para o token `i`, o contexto usa as tags I-O-B
//!   **já decididas** de `i-1` e `i-2` (nunca tags futuras) mais
//!   palavra/POS da janela. O arg-max do modelo vira a tag do token.
//! - **Estágio B (domínio)**: com todas as tags I-O-B da sentença
//!   finalizadas, o contexto usa os rótulos de domínio já decididos de
//!   `i-1`/`i-2`, as tags I-O-B de `i`, `i+1`, `i+2` e palavra/POS. O
//!   arg-max vira o rótulo, e o score bruto daquele outcome é registrado
//!   sem normalização.
//!
//! Um rótulo heurístico não-`O` vence o estágio B diretamente: o modelo só
//! decide onde as heurísticas não cobriram, mas os rótulos adotados ainda
//! alimentam o contexto dos tokens seguintes.
//!
//! A avaliação é total: depois que os modelos carregam, não existe caminho
//! de erro por token.

use crate::features::{Context, NEXT_WORD, OUTSIDE_TAG, POS_PLACEHOLDER, PREV_WORD};
use crate::perceptron::PerceptronModel;
use crate::sentence::Sentence;
use crate::tagger::EntityType;

/// Os dois modelos encadeados do rotulador.
#[derive(Debug, Clone)]
pub struct SequenceLabeler {
    iob_model: PerceptronModel,
    domain_model: PerceptronModel,
}

impl SequenceLabeler {
    pub fn new(iob_model: PerceptronModel, domain_model: PerceptronModel) -> Self {
        Self {
            iob_model,
            domain_model,
        }
    }

    /// Executa os dois estágios sobre a sentença.
    pub fn label(&self, sentence: &mut Sentence) {
        self.assign_iob(sentence);
        self.assign_domain(sentence);
    }

    /// Estágio A: tags I-O-B, da esquerda para a direita.
    fn assign_iob(&self, sentence: &mut Sentence) {
        for j in 0..sentence.tokens.len() {
            let mut context =
                Context::for_iob(&sentence.tokens[j].word, &sentence.tokens[j].pos);

            if j >= 2 {
                let t = &sentence.tokens[j - 2];
                context.set_pprevious_iob(&t.word, &t.pos, &t.iob);
            } else {
                context.set_pprevious_iob(PREV_WORD, POS_PLACEHOLDER, OUTSIDE_TAG);
            }
            if j >= 1 {
                let t = &sentence.tokens[j - 1];
                context.set_previous_iob(&t.word, &t.pos, &t.iob);
            } else {
                context.set_previous_iob(PREV_WORD, POS_PLACEHOLDER, OUTSIDE_TAG);
            }
            if j + 1 < sentence.tokens.len() {
                let t = &sentence.tokens[j + 1];
                context.set_next_word(&t.word, &t.pos);
            } else {
                context.set_next_word(NEXT_WORD, POS_PLACEHOLDER);
            }
            if j + 2 < sentence.tokens.len() {
                let t = &sentence.tokens[j + 2];
                context.set_nnext_word(&t.word, &t.pos);
            } else {
                context.set_nnext_word(NEXT_WORD, POS_PLACEHOLDER);
            }
            context.set_2previous_iob();
            context.set_previous_iob_and_word();

            let scores = self.iob_model.eval(&context.to_vec());
            let tag = self.iob_model.best_outcome(&scores).to_string();
            sentence.tokens[j].iob = tag;
        }
    }

    /// Estágio B: rótulos de domínio, com as tags I-O-B já finalizadas.
    fn assign_domain(&self, sentence: &mut Sentence) {
        for j in 0..sentence.tokens.len() {
            if !sentence.tokens[j].heuristic_label.is_outside() {
                // heurística vence; o rótulo adotado segue alimentando o
                // contexto dos próximos tokens
                sentence.tokens[j].domain_label = sentence.tokens[j].heuristic_label.clone();
                sentence.tokens[j].domain_score = 0.0;
                continue;
            }

            let mut context = Context::for_domain(
                &sentence.tokens[j].word,
                &sentence.tokens[j].pos,
                &sentence.tokens[j].iob,
            );

            if j >= 2 {
                let t = &sentence.tokens[j - 2];
                let label = t.domain_label.to_string();
                context.set_pprevious_label(&t.word, &t.pos, &t.iob, &label);
            } else {
                context.set_pprevious_label(
                    PREV_WORD,
                    POS_PLACEHOLDER,
                    OUTSIDE_TAG,
                    OUTSIDE_TAG,
                );
            }
            if j >= 1 {
                let t = &sentence.tokens[j - 1];
                let label = t.domain_label.to_string();
                context.set_previous_label(&t.word, &t.pos, &t.iob, &label);
            } else {
                context.set_previous_label(PREV_WORD, POS_PLACEHOLDER, OUTSIDE_TAG, OUTSIDE_TAG);
            }
            if j + 1 < sentence.tokens.len() {
                let t = &sentence.tokens[j + 1];
                context.set_next_iob(&t.word, &t.pos, &t.iob);
            } else {
                context.set_next_iob(NEXT_WORD, POS_PLACEHOLDER, OUTSIDE_TAG);
            }
            if j + 2 < sentence.tokens.len() {
                let t = &sentence.tokens[j + 2];
                context.set_nnext_iob(&t.word, &t.pos, &t.iob);
            } else {
                context.set_nnext_iob(NEXT_WORD, POS_PLACEHOLDER, OUTSIDE_TAG);
            }
            context.set_2previous_label();
            context.set_previous_label_and_word();
            context.set_previous_iob_and_word();

            let scores = self.domain_model.eval(&context.to_vec());
            let best = self.domain_model.best_outcome_index(&scores);
            let outcome = &self.domain_model.outcomes()[best];
            sentence.tokens[j].domain_label = EntityType::from_label(outcome);
            // score bruto do outcome escolhido, sem normalização
            sentence.tokens[j].domain_score = scores[best];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::EntityType;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn empty_domain_model() -> PerceptronModel {
        PerceptronModel::new(strings(&["O"]))
    }

    #[test]
    fn test_iob_stage_uses_already_decided_tags() {
        let mut iob_model = PerceptronModel::new(strings(&["O", "B", "I"]));
        iob_model.set_weight("NNP", "B", 1.0);
        // o composto só existe se a tag do token anterior já foi decidida
        iob_model.set_weight("B__Beta", "I", 5.0);

        let labeler = SequenceLabeler::new(iob_model, empty_domain_model());
        let mut sentence = Sentence::from_pairs(&[("Alpha", "NNP"), ("Beta", "NNP")]);
        labeler.label(&mut sentence);

        assert_eq!(sentence.tokens[0].iob, "B");
        assert_eq!(sentence.tokens[1].iob, "I");
    }

    #[test]
    fn test_domain_stage_records_raw_score() {
        let mut domain_model = PerceptronModel::new(strings(&["O"]));
        domain_model.set_weight("CD", "sw.version", 1.25);

        let labeler = SequenceLabeler::new(
            PerceptronModel::new(strings(&["O"])),
            domain_model,
        );
        let mut sentence = Sentence::from_pairs(&[("2.0.1", "CD")]);
        labeler.label(&mut sentence);

        assert_eq!(
            sentence.tokens[0].domain_label,
            EntityType::sw_version()
        );
        // soma bruta dos pesos ativos, não uma probabilidade
        assert_eq!(sentence.tokens[0].domain_score, 1.25);
    }

    #[test]
    fn test_heuristic_label_short_circuits_model() {
        let mut domain_model = PerceptronModel::new(strings(&["O"]));
        // o modelo votaria em vuln.description...
        domain_model.set_weight("NNP", "vuln.description", 10.0);

        let labeler = SequenceLabeler::new(
            PerceptronModel::new(strings(&["O"])),
            domain_model,
        );
        let mut sentence = Sentence::from_pairs(&[("Windows", "NNP")]);
        // ...mas a heurística já decidiu
        sentence.tokens[0].heuristic_label = EntityType::sw_product();
        labeler.label(&mut sentence);

        assert_eq!(sentence.tokens[0].domain_label, EntityType::sw_product());
        assert_eq!(sentence.tokens[0].domain_score, 0.0);
    }

    #[test]
    fn test_adopted_heuristic_feeds_following_context() {
        let mut domain_model = PerceptronModel::new(strings(&["O"]));
        // dispara somente se o rótulo anterior (adotado da heurística)
        // aparecer no contexto
        domain_model.set_weight("sw.product__7", "sw.version", 3.0);

        let labeler = SequenceLabeler::new(
            PerceptronModel::new(strings(&["O"])),
            domain_model,
        );
        let mut sentence = Sentence::from_pairs(&[("Windows", "NNP"), ("7", "CD")]);
        sentence.tokens[0].heuristic_label = EntityType::sw_product();
        labeler.label(&mut sentence);

        assert_eq!(sentence.tokens[1].domain_label, EntityType::sw_version());
    }

    #[test]
    fn test_zero_signal_sentence_stays_outside() {
        let labeler = SequenceLabeler::new(
            PerceptronModel::new(strings(&["O"])),
            empty_domain_model(),
        );
        let mut sentence =
            Sentence::from_pairs(&[("the", "DT"), ("server", "NN"), ("restarted", "VBD")]);
        labeler.label(&mut sentence);

        for token in &sentence.tokens {
            assert_eq!(token.iob, "O");
            assert!(token.domain_label.is_outside());
        }
    }

    #[test]
    fn test_first_token_boundary_placeholders() {
        // não deve entrar em pânico nem pular features na fronteira
        let labeler = SequenceLabeler::new(
            PerceptronModel::new(strings(&["O"])),
            empty_domain_model(),
        );
        let mut sentence = Sentence::from_pairs(&[("lone", "NN")]);
        labeler.label(&mut sentence);
        assert_eq!(sentence.tokens[0].iob, "O");
    }
}
