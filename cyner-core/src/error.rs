//! # Erros de Carga de Recursos
//!
//! Todo recurso externo (gazetteers, mapa de rótulos, modelos perceptron) é
//! carregado uma única vez na inicialização. Uma falha aqui é **fatal**:
//! o extrator não pode ser construído sem os recursos, e nunca assume
//! silenciosamente uma lista vazia — isso mudaria o recall do sistema sem
//! nenhum aviso ao operador.

use std::path::PathBuf;

use thiserror::Error;

/// Falhas possíveis ao carregar os recursos do extrator.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// O arquivo não pôde ser lido (inexistente, sem permissão, etc.).
    #[error("falha de E/S ao carregar recurso de '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// O arquivo existe mas o JSON não corresponde ao formato esperado.
    #[error("JSON inválido no recurso '{}'", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// O modelo foi desserializado mas viola alguma invariante interna
    /// (ex: lista de outcomes vazia, índice de outcome fora do intervalo).
    #[error("modelo malformado: {0}")]
    MalformedModel(String),
}
