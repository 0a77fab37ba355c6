//! # Recursos de Demonstração
//!
//! Um extrator real carrega listas e modelos treinados de arquivos
//! ([`crate::pipeline::EntityExtractor::from_files`]). Este módulo monta em
//! código um conjunto pequeno mas funcional de recursos — listas curadas e
//! pesos definidos à mão refletindo intuições sobre o texto de segurança —
//! para que o pipeline completo possa ser exercitado sem artefatos
//! externos.
//!
//! ## Como os pesos foram derivados
//!
//! Em produção os pesos vêm do treinamento do perceptron médio sobre um
//! corpus anotado. Aqui, codificamos os padrões mais fortes do domínio:
//! nomes próprios tendem a iniciar trechos, números tendem a ser versões,
//! e o rótulo do token anterior condiciona fortemente o seguinte.

use std::collections::HashSet;

use crate::gazetteer::{Gazetteer, GazetteerEntry, GazetteerSet};
use crate::memo::TokenLabelMap;
use crate::perceptron::PerceptronModel;
use crate::pipeline::EntityExtractor;
use crate::regex_rules::RuleSet;
use crate::tagger::{IOB_BEGIN, IOB_INSIDE, IOB_OUTSIDE};

/// Monta o extrator de demonstração completo.
pub fn demo_extractor() -> EntityExtractor {
    EntityExtractor::new(
        demo_gazetteers(),
        RuleSet::default(),
        demo_token_label_map(),
        demo_iob_model(),
        demo_domain_model(),
    )
}

/// Listas curadas de fabricantes, produtos/SO e termos relevantes.
pub fn demo_gazetteers() -> GazetteerSet {
    let vendors = Gazetteer::from_entries(
        "sw.vendor",
        vec![
            GazetteerEntry::new("Microsoft", &["Microsoft Corporation", "MSFT"]),
            GazetteerEntry::new("Oracle", &["Oracle Corporation"]),
            GazetteerEntry::new("Apple", &["Apple Inc"]),
            GazetteerEntry::new("Adobe", &["Adobe Systems"]),
            GazetteerEntry::new("Google", &[]),
            GazetteerEntry::new("Cisco", &["Cisco Systems"]),
            GazetteerEntry::new("Mozilla", &["Mozilla Foundation"]),
            GazetteerEntry::new("Sun", &["Sun Microsystems"]),
            GazetteerEntry::new("IBM", &[]),
            GazetteerEntry::new("Apache", &["Apache Software Foundation"]),
            GazetteerEntry::new("VMware", &[]),
            GazetteerEntry::new("Red Hat", &["RedHat"]),
        ],
    );

    let products = Gazetteer::from_entries(
        "sw.product",
        vec![
            GazetteerEntry::new("Windows", &[]),
            GazetteerEntry::new("Internet Explorer", &["IE", "MSIE"]),
            GazetteerEntry::new("Office", &["Microsoft Office"]),
            GazetteerEntry::new("Java", &["Java SE", "Java Runtime Environment", "JRE"]),
            GazetteerEntry::new("Flash Player", &["Flash"]),
            GazetteerEntry::new("Acrobat Reader", &["Acrobat", "Adobe Reader"]),
            GazetteerEntry::new("OpenSSL", &[]),
            GazetteerEntry::new("Tomcat", &["Apache Tomcat"]),
            GazetteerEntry::new("Firefox", &[]),
            GazetteerEntry::new("Chrome", &["Google Chrome"]),
            GazetteerEntry::new("Safari", &[]),
            GazetteerEntry::new("WordPress", &[]),
            GazetteerEntry::new("Vanilla Forums", &[]),
            GazetteerEntry::new("Exchange Server", &["Exchange"]),
        ],
    );

    // sistemas operacionais são tratados como produtos
    let operating_systems = Gazetteer::from_entries(
        "sw.product",
        vec![
            GazetteerEntry::new("Windows XP", &[]),
            GazetteerEntry::new("Windows Vista", &[]),
            GazetteerEntry::new("Windows Server", &[]),
            GazetteerEntry::new("Mac OS X", &["OS X", "macOS"]),
            GazetteerEntry::new("Linux", &[]),
            GazetteerEntry::new("Android", &[]),
            GazetteerEntry::new("iOS", &[]),
            GazetteerEntry::new("Solaris", &[]),
            GazetteerEntry::new("FreeBSD", &[]),
        ],
    );

    let relevant_terms: HashSet<String> = [
        "vulnerability",
        "exploit",
        "cross-site scripting",
        "sql injection",
        "buffer overflow",
        "denial of service",
        "remote code execution",
        "arbitrary code execution",
        "privilege escalation",
        "directory traversal",
        "command injection",
        "memory corruption",
        "information disclosure",
        "security bypass",
        "object injection",
        "unspecified impact",
        "remote attack vectors",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect();

    GazetteerSet::new(vendors, products, operating_systems, relevant_terms)
}

/// Tokens que tiveram rótulo único e recorrente no "treinamento".
pub fn demo_token_label_map() -> TokenLabelMap {
    use crate::tagger::EntityType;

    let mut map = TokenLabelMap::new();
    map.add("Heartbleed", EntityType::vuln_name());
    map.add("Shellshock", EntityType::vuln_name());
    map.add("Stuxnet", EntityType::vuln_name());
    map.add("XSS", EntityType::vuln_description());
    map.add("CSRF", EntityType::vuln_description());
    map.add("DoS", EntityType::vuln_description());
    map
}

/// Pesos manuais do estágio I-O-B.
pub fn demo_iob_model() -> PerceptronModel {
    let mut model = PerceptronModel::new(vec![
        IOB_OUTSIDE.to_string(),
        IOB_BEGIN.to_string(),
        IOB_INSIDE.to_string(),
    ]);

    // nomes próprios tendem a iniciar trechos
    model.set_weight("NNP", IOB_BEGIN, 1.2);
    model.set_weight("NNPS", IOB_BEGIN, 1.0);
    model.set_weight("CD", IOB_BEGIN, 0.4);

    // classes funcionais ficam fora de trechos
    for pos in ["DT", "IN", "TO", "CC", "VB", "VBD", "VBZ", "VBN", "PRP", "MD"] {
        model.set_weight(pos, IOB_OUTSIDE, 1.5);
    }
    for pos in [".", ",", ":", "''", "``", "-LRB-", "-RRB-"] {
        model.set_weight(pos, IOB_OUTSIDE, 3.0);
    }

    // substantivos comuns são neutros com leve tendência a O
    model.set_weight("NN", IOB_OUTSIDE, 0.6);
    model.set_weight("NNS", IOB_OUTSIDE, 0.6);
    model.set_weight("JJ", IOB_OUTSIDE, 0.8);

    // transições: depois de B/I, um nome próprio costuma continuar o trecho
    model.set_weight("B__B", IOB_OUTSIDE, 0.2);
    model.set_weight("O__B", IOB_INSIDE, 0.9);
    model.set_weight("B__I", IOB_INSIDE, 0.6);

    model
}

/// Pesos manuais do estágio de rótulo de domínio.
pub fn demo_domain_model() -> PerceptronModel {
    let mut model = PerceptronModel::new(vec!["O".to_string()]);

    // classes funcionais e pontuação ficam fora de entidades
    for pos in ["DT", "IN", "TO", "CC", "VB", "VBD", "VBZ", "VBN", "PRP", "MD"] {
        model.set_weight(pos, "O", 2.0);
    }
    for pos in [".", ",", ":", "''", "``", "-LRB-", "-RRB-"] {
        model.set_weight(pos, "O", 3.0);
    }
    model.set_weight("NN", "O", 0.8);
    model.set_weight("NNS", "O", 0.8);
    model.set_weight("JJ", "O", 0.8);

    // números são bons candidatos a versão
    model.set_weight("CD", "sw.version", 1.0);

    // o rótulo anterior condiciona o seguinte (valores de p_label/p2_label
    // aparecem como strings de contexto)
    model.set_weight("sw.product", "sw.version", 0.5);
    model.set_weight("sw.version", "sw.version", 0.5);
    model.set_weight("sw.vendor", "sw.product", 0.7);
    model.set_weight("vuln.description", "vuln.description", 0.4);

    // nomes próprios sem nenhum outro sinal pendem para produto
    model.set_weight("NNP", "sw.product", 0.6);
    model.set_weight("NNP", "O", 0.4);

    // sufixos típicos de descrição de vulnerabilidade
    model.set_weight("bility", "vuln.description", 0.5);
    model.set_weight("ection", "vuln.description", 0.4);
    model.set_weight("rflow", "vuln.description", 0.4);

    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::{Sentence, Sentences};
    use crate::tagger::EntityType;

    #[test]
    fn test_demo_extractor_basic_sentence() {
        let extractor = demo_extractor();
        let mut document = Sentences::new(vec![Sentence::from_pairs(&[
            ("Microsoft", "NNP"),
            ("Windows", "NNP"),
            ("7", "CD"),
            ("before", "IN"),
            ("SP1", "NN"),
            (".", "."),
        ])]);
        extractor.annotate(&mut document);

        let sentence = &document.sentences[0];
        assert_eq!(sentence.tokens[0].domain_label, EntityType::sw_vendor());
        assert_eq!(sentence.tokens[1].domain_label, EntityType::sw_product());
        assert_eq!(sentence.tokens[2].domain_label, EntityType::sw_product());
        assert_eq!(sentence.tokens[3].domain_label, EntityType::sw_version());
        assert_eq!(sentence.tokens[4].domain_label, EntityType::sw_version());
        assert!(sentence.tokens[5].domain_label.is_outside());

        let phrases: Vec<String> = sentence
            .mentions
            .iter()
            .map(|m| m.phrase(sentence))
            .collect();
        assert_eq!(phrases, vec!["Microsoft", "Windows 7", "before SP1"]);
    }

    #[test]
    fn test_demo_extractor_cve_and_file() {
        let extractor = demo_extractor();
        let mut sentence = Sentence::from_pairs(&[
            ("see", "VB"),
            ("file.php", "NN"),
            ("and", "CC"),
            ("CVE-2014-1234", "NN"),
        ]);
        extractor.annotate_sentence(&mut sentence, 0);

        assert_eq!(sentence.tokens[1].domain_label, EntityType::file_name());
        assert_eq!(sentence.tokens[3].domain_label, EntityType::vuln_cve());
    }

    #[test]
    fn test_demo_extractor_memo_token() {
        let extractor = demo_extractor();
        let mut sentence = Sentence::from_pairs(&[("Heartbleed", "NNP")]);
        extractor.annotate_sentence(&mut sentence, 0);
        assert_eq!(sentence.tokens[0].domain_label, EntityType::vuln_name());
    }

    #[test]
    fn test_demo_extractor_json_output() {
        let extractor = demo_extractor();
        let mut document = Sentences::new(vec![Sentence::from_pairs(&[
            ("OpenSSL", "NNP"),
            ("1.0.1", "CD"),
        ])]);
        let json = extractor.annotate_to_json(&mut document).unwrap();
        assert!(json.contains("sw"));
        assert!(json.contains("mentions"));
    }
}
