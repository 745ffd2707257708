//! Cenários de reconciliação do upload IAF sobre um banco em memória

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calamine::Data;
use sfera_common::UserId;
use sfera_errors::AppResult;

use asset_api::domain::{NovoUploadIaf, TipoAtivo};
use asset_api::error::IngestError;
use asset_api::ingest::schema::LinhaInventario;
use asset_api::ingest::{IngestOptions, IngestStats, IngestUnitOfWork, SheetRow, ingest_rows};

#[derive(Debug, Clone)]
struct Registro {
    id: i32,
    tipo: TipoAtivo,
    cod_loja: String,
    identificador: String,
    arquivo_origem: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct EstadoBanco {
    registros: Vec<Registro>,
    uploads: Vec<NovoUploadIaf>,
    lojas: HashMap<String, i32>,
    next_id: i32,
    committed: bool,
    rolled_back: bool,
}

impl EstadoBanco {
    fn seed(registros: &[(&str, &str, &str)]) -> Arc<Mutex<Self>> {
        let mut estado = Self {
            next_id: 1,
            ..Self::default()
        };
        for (cod_loja, identificador, arquivo) in registros {
            let id = estado.next_id;
            estado.next_id += 1;
            estado.registros.push(Registro {
                id,
                tipo: TipoAtivo::Computadores,
                cod_loja: cod_loja.to_string(),
                identificador: identificador.to_string(),
                arquivo_origem: Some(arquivo.to_string()),
            });
        }
        Arc::new(Mutex::new(estado))
    }
}

/// Unidade de trabalho em memória com semântica de snapshot:
/// `rollback` devolve o estado ao ponto do `begin`.
struct FakeUow {
    shared: Arc<Mutex<EstadoBanco>>,
    snapshot: EstadoBanco,
}

impl FakeUow {
    fn begin(shared: &Arc<Mutex<EstadoBanco>>) -> Self {
        let snapshot = shared.lock().unwrap().clone();
        Self {
            shared: Arc::clone(shared),
            snapshot,
        }
    }
}

#[async_trait]
impl IngestUnitOfWork for FakeUow {
    async fn store_id_by_code(&mut self, cod_loja: &str) -> AppResult<Option<i32>> {
        Ok(self.shared.lock().unwrap().lojas.get(cod_loja).copied())
    }

    async fn find_record(
        &mut self,
        tipo: TipoAtivo,
        cod_loja: &str,
        identificador: &str,
    ) -> AppResult<Option<i32>> {
        Ok(self
            .shared
            .lock()
            .unwrap()
            .registros
            .iter()
            .find(|r| {
                r.tipo == tipo && r.cod_loja == cod_loja && r.identificador == identificador
            })
            .map(|r| r.id))
    }

    async fn insert_record(
        &mut self,
        _loja_id: Option<i32>,
        nome_arquivo: &str,
        linha: &LinhaInventario,
    ) -> AppResult<()> {
        let tipo = match linha {
            LinhaInventario::Computador(_) => TipoAtivo::Computadores,
            LinhaInventario::Celular(_) => TipoAtivo::Celulares,
        };
        let mut estado = self.shared.lock().unwrap();
        let id = estado.next_id;
        estado.next_id += 1;
        estado.registros.push(Registro {
            id,
            tipo,
            cod_loja: linha.cod_loja().to_string(),
            identificador: linha.identificador().to_string(),
            arquivo_origem: Some(nome_arquivo.to_string()),
        });
        Ok(())
    }

    async fn update_record(
        &mut self,
        id: i32,
        _loja_id: Option<i32>,
        nome_arquivo: &str,
        _linha: &LinhaInventario,
    ) -> AppResult<()> {
        let mut estado = self.shared.lock().unwrap();
        if let Some(registro) = estado.registros.iter_mut().find(|r| r.id == id) {
            registro.arquivo_origem = Some(nome_arquivo.to_string());
        }
        Ok(())
    }

    async fn count_total(&mut self, tipo: TipoAtivo) -> AppResult<u64> {
        Ok(self
            .shared
            .lock()
            .unwrap()
            .registros
            .iter()
            .filter(|r| r.tipo == tipo)
            .count() as u64)
    }

    async fn count_stale(&mut self, tipo: TipoAtivo, nome_arquivo: &str) -> AppResult<u64> {
        Ok(self
            .shared
            .lock()
            .unwrap()
            .registros
            .iter()
            .filter(|r| r.tipo == tipo && r.arquivo_origem.as_deref() != Some(nome_arquivo))
            .count() as u64)
    }

    async fn delete_stale(&mut self, tipo: TipoAtivo, nome_arquivo: &str) -> AppResult<u64> {
        let mut estado = self.shared.lock().unwrap();
        let antes = estado.registros.len();
        estado
            .registros
            .retain(|r| r.tipo != tipo || r.arquivo_origem.as_deref() == Some(nome_arquivo));
        Ok((antes - estado.registros.len()) as u64)
    }

    async fn record_upload(&mut self, upload: &NovoUploadIaf) -> AppResult<()> {
        self.shared.lock().unwrap().uploads.push(upload.clone());
        Ok(())
    }

    async fn commit(self) -> AppResult<()> {
        self.shared.lock().unwrap().committed = true;
        Ok(())
    }

    async fn rollback(self) -> AppResult<()> {
        let mut estado = self.shared.lock().unwrap();
        *estado = self.snapshot;
        estado.rolled_back = true;
        Ok(())
    }
}

fn linha_computador(cod_loja: &str, computador: &str) -> SheetRow {
    SheetRow::from_cells([
        ("Cód. Loja".to_string(), Data::String(cod_loja.to_string())),
        ("Computador".to_string(), Data::String(computador.to_string())),
    ])
}

async fn ingerir(
    shared: &Arc<Mutex<EstadoBanco>>,
    nome_arquivo: &str,
    rows: &[SheetRow],
    options: &IngestOptions,
) -> Result<IngestStats, IngestError> {
    let uow = FakeUow::begin(shared);
    ingest_rows(
        uow,
        TipoAtivo::Computadores,
        UserId(1),
        nome_arquivo,
        rows,
        options,
    )
    .await
}

#[tokio::test]
async fn test_primeiro_upload_insere_todas_as_linhas() {
    let shared = EstadoBanco::seed(&[]);
    let rows = vec![
        linha_computador("L001", "PDV-01"),
        linha_computador("L001", "PDV-02"),
        linha_computador("L002", "PDV-03"),
    ];

    let stats = ingerir(&shared, "iaf.xlsx", &rows, &IngestOptions::default())
        .await
        .unwrap();

    assert_eq!(stats.total_linhas, 3);
    assert_eq!(stats.inseridos, 3);
    assert_eq!(stats.atualizados, 0);
    assert_eq!(stats.removidos, 0);
    assert_eq!(stats.erros, 0);

    let estado = shared.lock().unwrap();
    assert!(estado.committed);
    assert_eq!(estado.registros.len(), 3);
    assert_eq!(estado.uploads.len(), 1);
    assert_eq!(estado.uploads[0].registros_inseridos, 3);
}

#[tokio::test]
async fn test_reingestao_do_mesmo_arquivo_apenas_atualiza() {
    let shared = EstadoBanco::seed(&[]);
    let rows = vec![
        linha_computador("L001", "PDV-01"),
        linha_computador("L001", "PDV-02"),
    ];
    let options = IngestOptions::default();

    ingerir(&shared, "iaf.xlsx", &rows, &options).await.unwrap();
    let stats = ingerir(&shared, "iaf.xlsx", &rows, &options).await.unwrap();

    assert_eq!(stats.inseridos, 0);
    assert_eq!(stats.atualizados, 2);
    assert_eq!(stats.removidos, 0);
    assert_eq!(shared.lock().unwrap().registros.len(), 2);
}

#[tokio::test]
async fn test_substituicao_remove_registro_ausente() {
    let shared = EstadoBanco::seed(&[]);
    let options = IngestOptions::default();

    let primeiro = vec![
        linha_computador("L001", "PDV-01"),
        linha_computador("L001", "PDV-02"),
    ];
    ingerir(&shared, "iaf-v1.xlsx", &primeiro, &options)
        .await
        .unwrap();

    // PDV-02 saiu da planilha: metade do inventário, ainda dentro da trava
    let segundo = vec![linha_computador("L001", "PDV-01")];
    let stats = ingerir(&shared, "iaf-v2.xlsx", &segundo, &options)
        .await
        .unwrap();

    assert_eq!(stats.atualizados, 1);
    assert_eq!(stats.removidos, 1);

    let estado = shared.lock().unwrap();
    assert_eq!(estado.registros.len(), 1);
    assert_eq!(estado.registros[0].identificador, "PDV-01");

    // a auditoria registra exatamente o que cada upload fez
    assert_eq!(estado.uploads.len(), 2);
    assert_eq!(estado.uploads[1].registros_atualizados, 1);
    assert_eq!(estado.uploads[1].registros_removidos, 1);
    assert_eq!(estado.uploads[1].nome_arquivo, "iaf-v2.xlsx");
}

#[tokio::test]
async fn test_linha_sem_identificador_conta_como_erro() {
    let shared = EstadoBanco::seed(&[]);
    let sem_identificador = SheetRow::from_cells([(
        "Cód. Loja".to_string(),
        Data::String("L001".to_string()),
    )]);
    let rows = vec![linha_computador("L001", "PDV-01"), sem_identificador];

    let stats = ingerir(&shared, "iaf.xlsx", &rows, &IngestOptions::default())
        .await
        .unwrap();

    assert_eq!(stats.total_linhas, 2);
    assert_eq!(stats.inseridos, 1);
    assert_eq!(stats.erros, 1);

    let estado = shared.lock().unwrap();
    assert_eq!(estado.uploads[0].registros_com_erro, 1);
}

#[tokio::test]
async fn test_trava_recusa_remocao_em_massa() {
    let shared = EstadoBanco::seed(&[
        ("L001", "PDV-01", "antigo.xlsx"),
        ("L001", "PDV-02", "antigo.xlsx"),
        ("L002", "PDV-03", "antigo.xlsx"),
        ("L002", "PDV-04", "antigo.xlsx"),
    ]);

    let rows = vec![linha_computador("L009", "PDV-99")];
    let err = ingerir(&shared, "novo.xlsx", &rows, &IngestOptions::default())
        .await
        .unwrap_err();

    // 4 de 5 registros seriam removidos
    assert!(matches!(
        err,
        IngestError::RemovalGuard {
            would_remove: 4,
            total: 5
        }
    ));

    let estado = shared.lock().unwrap();
    assert!(estado.rolled_back);
    assert!(!estado.committed);
    // o rollback desfaz o upsert e nenhuma auditoria é gravada
    assert_eq!(estado.registros.len(), 4);
    assert!(estado.uploads.is_empty());
}

#[tokio::test]
async fn test_upload_sem_linhas_validas_nao_esvazia_o_inventario() {
    let shared = EstadoBanco::seed(&[
        ("L001", "PDV-01", "antigo.xlsx"),
        ("L001", "PDV-02", "antigo.xlsx"),
    ]);

    // nenhuma linha tem identificador: todas viram erro e nada é upsertado
    let sem_identificador = SheetRow::from_cells([(
        "Cód. Loja".to_string(),
        Data::String("L001".to_string()),
    )]);
    let rows = vec![sem_identificador.clone(), sem_identificador];

    let err = ingerir(&shared, "vazio.xlsx", &rows, &IngestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        IngestError::RemovalGuard {
            would_remove: 2,
            total: 2
        }
    ));
    assert_eq!(shared.lock().unwrap().registros.len(), 2);
}

#[tokio::test]
async fn test_forcar_remocao_substitui_o_inventario() {
    let shared = EstadoBanco::seed(&[
        ("L001", "PDV-01", "antigo.xlsx"),
        ("L001", "PDV-02", "antigo.xlsx"),
        ("L002", "PDV-03", "antigo.xlsx"),
        ("L002", "PDV-04", "antigo.xlsx"),
    ]);

    let rows = vec![linha_computador("L009", "PDV-99")];
    let options = IngestOptions {
        forcar_remocao: true,
        ..IngestOptions::default()
    };
    let stats = ingerir(&shared, "novo.xlsx", &rows, &options).await.unwrap();

    assert_eq!(stats.inseridos, 1);
    assert_eq!(stats.removidos, 4);

    let estado = shared.lock().unwrap();
    assert!(estado.committed);
    assert_eq!(estado.registros.len(), 1);
    assert_eq!(estado.registros[0].identificador, "PDV-99");
    assert_eq!(estado.uploads[0].registros_removidos, 4);
}

#[tokio::test]
async fn test_razao_configuravel_da_trava() {
    let shared = EstadoBanco::seed(&[
        ("L001", "PDV-01", "antigo.xlsx"),
        ("L001", "PDV-02", "antigo.xlsx"),
    ]);

    // 2 de 3 removidos (0.67): passa com limite 0.8, recusa com o padrão
    let rows = vec![linha_computador("L001", "PDV-03")];
    let options = IngestOptions {
        forcar_remocao: false,
        max_removal_ratio: 0.8,
    };
    let stats = ingerir(&shared, "novo.xlsx", &rows, &options).await.unwrap();

    assert_eq!(stats.removidos, 2);
    assert_eq!(shared.lock().unwrap().registros.len(), 1);
}
