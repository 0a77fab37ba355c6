//! # Motor de Regras Contextuais
//!
//! O segundo estágio heurístico revisa os rótulos preliminares usando regras
//! de janela: cada token é avaliado junto com dois vizinhos anteriores e
//! quatro posteriores. Uma regra combina:
//!
//! - **predicados de palavra**: o texto dos offsets nomeados (concatenado com
//!   espaço) deve casar com uma lista de padrões — OU entre padrões, a menos
//!   que algum padrão carregue flag de negação, quando a lista vira um E de
//!   (casa / não-casa por padrão);
//! - **predicados de rótulo**: o rótulo heurístico *atual* do token no offset
//!   deve casar com o padrão dado (ex: "o token anterior já é produto");
//! - **mapa de atribuição**: os offsets que recebem o rótulo da regra.
//!
//! As regras formam uma tabela ordenada fixa; para cada posição de token, a
//! **primeira regra cujos predicados todos valem aplica sua atribuição e as
//! demais são ignoradas** naquela invocação. Janelas de invocações vizinhas
//! se sobrepõem, então uma regra posterior ainda pode agir em outra posição.
//!
//! Offsets que caem fora da sentença viram sentinelas: um predicado que toca
//! uma sentinela falha a regra inteira (sentinelas nunca casam), e
//! atribuições a sentinelas são descartadas. A ordem importa: regras
//! multi-palavra específicas precedem as genéricas de uma palavra que
//! consumiriam a mesma janela.

use regex::Regex;
use tracing::debug;

use crate::sentence::{Sentence, Token};
use crate::tagger::{EntityType, HeuristicMethod};

/// Posição relativa ao token corrente dentro da janela de avaliação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    PPrev,
    Prev,
    Current,
    Next,
    Next2,
    Next3,
    Next4,
}

impl Offset {
    /// Índice do offset dentro da janela de [`WINDOW_SIZE`] posições.
    pub fn index(self) -> usize {
        match self {
            Offset::PPrev => 0,
            Offset::Prev => 1,
            Offset::Current => 2,
            Offset::Next => 3,
            Offset::Next2 => 4,
            Offset::Next3 => 5,
            Offset::Next4 => 6,
        }
    }
}

/// Dois tokens antes, o corrente e quatro depois.
pub const WINDOW_SIZE: usize = 7;

/// Um padrão de palavra, possivelmente negado.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub regex: Regex,
    pub negate: bool,
}

/// Padrão afirmativo.
fn re(pattern: &str) -> Pattern {
    Pattern {
        regex: Regex::new(pattern).expect("padrão de regra inválido"),
        negate: false,
    }
}

/// Padrão negado: o texto NÃO pode casar.
fn not(pattern: &str) -> Pattern {
    Pattern {
        regex: Regex::new(pattern).expect("padrão de regra inválido"),
        negate: true,
    }
}

/// Predicado sobre o texto de um ou mais offsets da janela.
#[derive(Debug, Clone)]
pub struct WordPattern {
    pub offsets: Vec<Offset>,
    pub patterns: Vec<Pattern>,
}

fn word(offsets: &[Offset], patterns: Vec<Pattern>) -> WordPattern {
    WordPattern {
        offsets: offsets.to_vec(),
        patterns,
    }
}

impl WordPattern {
    fn matches(&self, window: &[Option<&Token>; WINDOW_SIZE]) -> bool {
        let mut parts = Vec::with_capacity(self.offsets.len());
        for offset in &self.offsets {
            match window[offset.index()] {
                Some(token) => parts.push(token.word.as_str()),
                // sentinelas nunca casam
                None => return false,
            }
        }
        let text = parts.join(" ");

        if self.patterns.iter().any(|p| p.negate) {
            // com negação presente, a lista vira conjunção
            self.patterns
                .iter()
                .all(|p| p.regex.is_match(&text) != p.negate)
        } else {
            self.patterns.iter().any(|p| p.regex.is_match(&text))
        }
    }
}

/// Predicado sobre a forma textual do rótulo heurístico atual de um offset.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    pub offset: Offset,
    pub pattern: Regex,
}

fn label(offset: Offset, pattern: &str) -> LabelPattern {
    LabelPattern {
        offset,
        pattern: Regex::new(pattern).expect("padrão de rótulo inválido"),
    }
}

impl LabelPattern {
    fn matches(&self, window: &[Option<&Token>; WINDOW_SIZE]) -> bool {
        match window[self.offset.index()] {
            Some(token) => self.pattern.is_match(&token.heuristic_label.to_string()),
            None => false,
        }
    }
}

/// Uma regra: conjunção ordenada de predicados mais o mapa de atribuição.
///
/// A atribuição só escreve nos offsets declarados em `assign`, que não
/// precisam coincidir com os offsets referenciados pelos predicados.
#[derive(Debug, Clone)]
pub struct RegexRule {
    pub name: &'static str,
    pub words: Vec<WordPattern>,
    pub labels: Vec<LabelPattern>,
    pub assign: Vec<(Offset, EntityType)>,
}

impl RegexRule {
    /// Verdadeiro se todos os predicados valem para a janela dada.
    pub fn matches(&self, window: &[Option<&Token>; WINDOW_SIZE]) -> bool {
        self.words.iter().all(|w| w.matches(window))
            && self.labels.iter().all(|l| l.matches(window))
    }
}

/// Tabela ordenada de regras, interpretada por um único laço avaliador.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<RegexRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<RegexRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RegexRule] {
        &self.rules
    }

    /// Avalia a tabela para cada posição de token da sentença.
    pub fn annotate(&self, sentence: &mut Sentence) {
        for i in 0..sentence.tokens.len() {
            self.apply_at(sentence, i);
        }
    }

    /// Uma invocação: primeira regra que casa vence, as demais são puladas.
    fn apply_at(&self, sentence: &mut Sentence, position: usize) {
        let window = window_at(sentence.tokens.len(), position);
        let matched = {
            let view: [Option<&Token>; WINDOW_SIZE] =
                window.map(|slot| slot.map(|idx| &sentence.tokens[idx]));
            self.rules.iter().find(|rule| rule.matches(&view))
        };

        if let Some(rule) = matched {
            debug!(rule = rule.name, position, "regra aplicada");
            for (offset, entity_type) in &rule.assign {
                if let Some(idx) = window[offset.index()] {
                    let token = &mut sentence.tokens[idx];
                    token.heuristic_label = entity_type.clone();
                    token.heuristic_method = HeuristicMethod::Regex;
                }
            }
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

/// Índices de token da janela; `None` onde a fronteira da sentença é mais
/// próxima que o offset.
fn window_at(len: usize, position: usize) -> [Option<usize>; WINDOW_SIZE] {
    let mut window = [None; WINDOW_SIZE];
    for (slot, item) in window.iter_mut().enumerate() {
        let delta = slot as isize - Offset::Current.index() as isize;
        let idx = position as isize + delta;
        if idx >= 0 && (idx as usize) < len {
            *item = Some(idx as usize);
        }
    }
    window
}

/// A tabela padrão de regras, em ordem de prioridade.
///
/// Agrupada por propósito: identificadores CVE/MS, descrições de
/// vulnerabilidade multi-palavra, frases de enumeração de versões, formas
/// fortes de número de versão, versões dependentes do rótulo anterior,
/// nomes de arquivo, nomes de função, produtos prefixados por fabricante e
/// vulnerabilidades nomeadas.
pub fn default_rules() -> Vec<RegexRule> {
    use Offset::{Current, Next, Next2, Next3, PPrev, Prev};

    vec![
        // === identificadores de vulnerabilidade ===
        RegexRule {
            name: "cve-id",
            words: vec![word(&[Current], vec![re(r"^(?:CVE|CAN)-[0-9]{4}-[0-9]{4,}$")])],
            labels: vec![],
            assign: vec![(Current, EntityType::vuln_cve())],
        },
        RegexRule {
            name: "ms-bulletin",
            words: vec![word(&[Current], vec![re(r"^MS[0-9]{2}-[0-9]{3}$")])],
            labels: vec![],
            assign: vec![(Current, EntityType::vuln_ms())],
        },
        // === descrições de vulnerabilidade multi-palavra ===
        RegexRule {
            name: "vuln-phrase-trigram",
            words: vec![word(
                &[Current, Next, Next2],
                vec![re(
                    r"(?i)^(?:denial of service|out of bounds read|out of bounds write|man in the)$",
                )],
            )],
            labels: vec![],
            assign: vec![
                (Current, EntityType::vuln_description()),
                (Next, EntityType::vuln_description()),
                (Next2, EntityType::vuln_description()),
            ],
        },
        RegexRule {
            name: "vuln-phrase-bigram",
            words: vec![word(
                &[Current, Next],
                vec![re(
                    r"(?i)^(?:cross-site scripting|sql injection|buffer overflow|heap overflow|stack overflow|code execution|privilege escalation|directory traversal|command injection|integer overflow|format string|use after|memory corruption)$",
                )],
            )],
            labels: vec![],
            assign: vec![
                (Current, EntityType::vuln_description()),
                (Next, EntityType::vuln_description()),
            ],
        },
        // === frases de enumeração de versões ===
        RegexRule {
            name: "all-supported-versions",
            words: vec![
                word(&[Current], vec![re(r"(?i)^(?:all|every)$")]),
                word(&[Next], vec![re(r"(?i)^supported$")]),
                word(&[Next2], vec![re(r"(?i)^(?:versions?|releases?)$")]),
            ],
            labels: vec![],
            assign: vec![
                (Current, EntityType::sw_version()),
                (Next, EntityType::sw_version()),
                (Next2, EntityType::sw_version()),
            ],
        },
        RegexRule {
            name: "all-versions",
            words: vec![
                word(&[Current], vec![re(r"(?i)^(?:all|every)$")]),
                word(&[Next], vec![re(r"(?i)^(?:versions?|releases?)$")]),
            ],
            labels: vec![],
            assign: vec![
                (Current, EntityType::sw_version()),
                (Next, EntityType::sw_version()),
            ],
        },
        RegexRule {
            name: "versions-prior-to",
            words: vec![
                word(&[Current], vec![re(r"(?i)^(?:versions?|releases?)$")]),
                word(&[Next], vec![re(r"(?i)^(?:prior|previous)$")]),
                word(&[Next2], vec![re(r"(?i)^to$")]),
                word(&[Next3], vec![re(r"^[0-9][0-9a-zA-Z._\-]*$")]),
            ],
            labels: vec![],
            assign: vec![
                (Current, EntityType::sw_version()),
                (Next, EntityType::sw_version()),
                (Next2, EntityType::sw_version()),
                (Next3, EntityType::sw_version()),
            ],
        },
        RegexRule {
            name: "number-and-earlier",
            words: vec![
                word(&[Current], vec![re(r"^[0-9][0-9a-zA-Z._x\-]*$")]),
                word(&[Next], vec![re(r"(?i)^and$")]),
                word(
                    &[Next2],
                    vec![re(r"(?i)^(?:earlier|later|prior|previous|before|above|below)$")],
                ),
            ],
            labels: vec![],
            assign: vec![
                (Current, EntityType::sw_version()),
                (Next, EntityType::sw_version()),
                (Next2, EntityType::sw_version()),
            ],
        },
        RegexRule {
            name: "before-version-phrase",
            words: vec![word(
                &[Current, Next],
                vec![re(
                    r"(?i)^(?:before|after|prior|through|thru|earlier) (?:[a-z]{1,3}[0-9]{1,2}|[0-9][0-9a-z._\-]*)$",
                )],
            )],
            labels: vec![label(Prev, r"^sw\.product$")],
            assign: vec![
                (Current, EntityType::sw_version()),
                (Next, EntityType::sw_version()),
            ],
        },
        RegexRule {
            name: "prior-to-version",
            words: vec![
                word(&[Current, Next], vec![re(r"(?i)^(?:prior to|up to)$")]),
                word(&[Next2], vec![re(r"^[0-9][0-9a-zA-Z._\-]*$")]),
            ],
            labels: vec![],
            assign: vec![
                (Current, EntityType::sw_version()),
                (Next, EntityType::sw_version()),
                (Next2, EntityType::sw_version()),
            ],
        },
        RegexRule {
            name: "service-pack-number",
            words: vec![
                word(&[Current], vec![re(r"(?i)^service$")]),
                word(&[Next], vec![re(r"(?i)^pack$")]),
                word(&[Next2], vec![re(r"^[0-9]+$")]),
            ],
            labels: vec![],
            assign: vec![
                (Current, EntityType::sw_version()),
                (Next, EntityType::sw_version()),
                (Next2, EntityType::sw_version()),
            ],
        },
        RegexRule {
            name: "service-pack",
            words: vec![
                word(&[Current], vec![re(r"(?i)^service$")]),
                word(&[Next], vec![re(r"(?i)^pack$")]),
            ],
            labels: vec![],
            assign: vec![
                (Current, EntityType::sw_version()),
                (Next, EntityType::sw_version()),
            ],
        },
        RegexRule {
            name: "release-update-number",
            words: vec![
                word(&[Current], vec![re(r"(?i)^(?:release|update|patch|build)$")]),
                word(&[Next], vec![re(r"^[0-9][0-9a-zA-Z._\-]*$")]),
            ],
            labels: vec![],
            assign: vec![
                (Current, EntityType::sw_version()),
                (Next, EntityType::sw_version()),
            ],
        },
        RegexRule {
            name: "version-keyword-number",
            words: vec![
                word(&[Current], vec![re(r"^[vV]ersions?$")]),
                word(&[Next], vec![re(r"^[0-9][0-9a-zA-Z._x\-]*$")]),
            ],
            labels: vec![],
            assign: vec![
                (Current, EntityType::sw_version()),
                (Next, EntityType::sw_version()),
            ],
        },
        // === formas fortes de número de versão (sem contexto) ===
        RegexRule {
            name: "version-shape",
            words: vec![word(
                &[Current],
                vec![
                    re(r"^[0-9]+(?:\.|x)+[0-9a-zA-Z.\-]+$"),
                    re(r"^[0-9.x]{2,}\.+-[0-9a-zA-Z.]+$"),
                    re(r"^[0-9.x]+_[a-zA-Z0-9.]+$"),
                    re(r"^[0-9.x]+-(?:[0-9.]+[a-zA-Z0-9._\-]*|[a-zA-Z0-9._\-]*[0-9.]+)$"),
                ],
            )],
            labels: vec![],
            assign: vec![(Current, EntityType::sw_version())],
        },
        RegexRule {
            name: "version-v-prefix",
            words: vec![word(&[Current], vec![re(r"^v[0-9][0-9a-zA-Z._\-]*$")])],
            labels: vec![],
            assign: vec![(Current, EntityType::sw_version())],
        },
        RegexRule {
            name: "kb-article",
            words: vec![word(&[Current], vec![re(r"(?i)^KB[0-9]{5,7}$")])],
            labels: vec![],
            assign: vec![(Current, EntityType::sw_version())],
        },
        // === versões dependentes do rótulo anterior ===
        RegexRule {
            // número curto após produto integra o nome ("Windows 7")
            name: "product-model-number",
            words: vec![word(&[Current], vec![re(r"^[0-9]{1,4}$")])],
            labels: vec![label(Prev, r"^sw\.product$")],
            assign: vec![(Current, EntityType::sw_product())],
        },
        RegexRule {
            // número composto após produto/versão é versão; a negação exclui
            // o inteiro curto já consumido pela regra anterior
            name: "version-after-product",
            words: vec![word(
                &[Current],
                vec![re(r"^[0-9][0-9a-zA-Z._x\-]*$"), not(r"^[0-9]{1,4}$")],
            )],
            labels: vec![label(Prev, r"^sw\.(?:product|version)$")],
            assign: vec![(Current, EntityType::sw_version())],
        },
        RegexRule {
            name: "release-update-after-product",
            words: vec![word(
                &[Current],
                vec![re(r"(?i)^(?:release|update)[_\-a-zA-Z0-9]*$")],
            )],
            labels: vec![label(Prev, r"^sw\.product$")],
            assign: vec![(Current, EntityType::sw_version())],
        },
        RegexRule {
            name: "beta-alpha",
            words: vec![word(
                &[Current],
                vec![re(r"(?i)^(?:beta|alpha|rc)[_0-9a-zA-Z.]*$")],
            )],
            labels: vec![label(Prev, r"^sw\.(?:product|version)$")],
            assign: vec![(Current, EntityType::sw_version())],
        },
        RegexRule {
            name: "pre-release-suffix",
            words: vec![word(&[Current], vec![re(r"^pre[0-9a-zA-Z._\-]*$")])],
            labels: vec![label(Prev, r"^sw\.version$")],
            assign: vec![(Current, EntityType::sw_version())],
        },
        RegexRule {
            // "2.0 SP1"
            name: "sp-after-version",
            words: vec![word(&[Current], vec![re(r"^[A-Z]{1,3}[0-9]{1,2}$")])],
            labels: vec![label(Prev, r"^sw\.version$")],
            assign: vec![(Current, EntityType::sw_version())],
        },
        RegexRule {
            // "1.2 , 1.3 and 1.4" — separadores herdam o rótulo para manter
            // a sequência de versões contígua
            name: "version-list-separator",
            words: vec![
                word(&[Current], vec![re(r"^(?:,|and|or)$")]),
                word(&[Next], vec![re(r"^[0-9][0-9a-zA-Z._x\-]*$")]),
            ],
            labels: vec![label(Prev, r"^sw\.version$")],
            assign: vec![
                (Current, EntityType::sw_version()),
                (Next, EntityType::sw_version()),
            ],
        },
        RegexRule {
            name: "version-range-x",
            words: vec![word(&[Current], vec![re(r"^[0-9]+[.x][0-9.x]*$")])],
            labels: vec![label(Prev, r"^sw\.version$")],
            assign: vec![(Current, EntityType::sw_version())],
        },
        RegexRule {
            name: "versions-after-product",
            words: vec![word(&[Current], vec![re(r"(?i)^versions?$")])],
            labels: vec![label(Prev, r"^sw\.product$")],
            assign: vec![(Current, EntityType::sw_version())],
        },
        // === nomes de arquivo ===
        RegexRule {
            name: "file-extension",
            words: vec![word(
                &[Current],
                vec![re(
                    r"(?i)^[\w.\-/\\]+\.(?:exe|dll|so|dylib|php|js|jsp|asp|aspx|html?|css|py|pl|rb|sh|bat|cgi|c|cpp|h|hpp|java|class|jar|war|swf|zip|tar|gz|tgz|rar|7z|doc|docx|xls|xlsx|ppt|pptx|pdf|rtf|txt|log|ini|cfg|conf|sys|drv|dat|tmp|bin)$",
                )],
            )],
            labels: vec![],
            assign: vec![(Current, EntityType::file_name())],
        },
        RegexRule {
            // nome pontuado com extensão desconhecida; a negação exclui
            // números de versão puros como "2.x"
            name: "dotted-file-name",
            words: vec![word(
                &[Current],
                vec![
                    re(r"^[A-Za-z0-9_\-]+\.[A-Za-z][A-Za-z0-9]{1,9}$"),
                    not(r"^[0-9][0-9.x]*$"),
                ],
            )],
            labels: vec![label(Current, r"^O$")],
            assign: vec![(Current, EntityType::file_name())],
        },
        RegexRule {
            name: "path-name",
            words: vec![word(
                &[Current],
                vec![re(r"^(?:[A-Za-z]:)?[\w.\-]*(?:[/\\][\w.\-]+)+$")],
            )],
            labels: vec![],
            assign: vec![(Current, EntityType::file_name())],
        },
        // === nomes de função ===
        RegexRule {
            name: "function-call-parens",
            words: vec![word(
                &[Current],
                vec![re(r"^[A-Za-z_][A-Za-z0-9_:.]*\(\)$")],
            )],
            labels: vec![],
            assign: vec![(Current, EntityType::function_name())],
        },
        RegexRule {
            // "eval_string function", "parseHeader method"
            name: "function-before-keyword",
            words: vec![
                word(
                    &[Current],
                    vec![
                        re(r"^[a-z0-9]+_[a-z0-9_]+$"),
                        re(r"^[a-z]+[A-Z][A-Za-z0-9]*$"),
                    ],
                ),
                word(&[Next], vec![re(r"(?i)^(?:function|method|routine|call)$")]),
            ],
            labels: vec![],
            assign: vec![(Current, EntityType::function_name())],
        },
        RegexRule {
            // atribui apenas ao vizinho: "function parseHeader"
            name: "function-after-keyword",
            words: vec![
                word(&[Current], vec![re(r"(?i)^(?:function|method)$")]),
                word(
                    &[Next],
                    vec![
                        re(r"^[A-Za-z0-9]+_[A-Za-z0-9_]+$"),
                        re(r"^[a-z]+[A-Z][A-Za-z0-9]*$"),
                        re(r"^[A-Za-z_][A-Za-z0-9_]*\(\)$"),
                    ],
                ),
            ],
            labels: vec![],
            assign: vec![(Next, EntityType::function_name())],
        },
        // === produtos prefixados por fabricante ===
        RegexRule {
            // "Oracle DBRM" — capitalizado sem rótulo após fabricante
            name: "vendor-prefixed-product",
            words: vec![word(&[Current], vec![re(r"^[A-Z][A-Za-z0-9.+\-]*$")])],
            labels: vec![
                label(Prev, r"^sw\.vendor$"),
                label(Current, r"^O$"),
            ],
            assign: vec![(Current, EntityType::sw_product())],
        },
        RegexRule {
            // "Sun Java SE" — continuação do nome do produto
            name: "product-name-continuation",
            words: vec![word(&[Current], vec![re(r"^[A-Z][A-Za-z0-9.+\-]*$")])],
            labels: vec![
                label(PPrev, r"^sw\.vendor$"),
                label(Prev, r"^sw\.product$"),
                label(Current, r"^O$"),
            ],
            assign: vec![(Current, EntityType::sw_product())],
        },
        // === vulnerabilidades nomeadas ===
        RegexRule {
            name: "named-vulnerability",
            words: vec![
                word(&[Current], vec![re(r"^[A-Z][A-Za-z0-9\-]{2,}$")]),
                word(
                    &[Next],
                    vec![re(r"(?i)^(?:vulnerability|flaw|bug|exploit|attack)$")],
                ),
            ],
            labels: vec![label(Current, r"^O$")],
            assign: vec![(Current, EntityType::vuln_name())],
        },
        RegexRule {
            name: "malware-name",
            words: vec![
                word(&[Current], vec![re(r"^[A-Z][A-Za-z0-9\-]{2,}$")]),
                word(
                    &[Next],
                    vec![re(r"(?i)^(?:worm|trojan|malware|ransomware|botnet|rootkit)$")],
                ),
            ],
            labels: vec![label(Current, r"^O$")],
            assign: vec![(Current, EntityType::vuln_name())],
        },
    ]
}
