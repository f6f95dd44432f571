use serde::Serialize;

use crate::format::{format_chave, format_cpf_cnpj, format_currency, format_currency_with, format_data, format_hora};
use crate::nfe::{Nfe, Parte};

/// Flattened party record: entity fields merged with address fields.
///
/// An absent party (or an absent address) contributes empty strings, never
/// an absent record, so the template can reference any field of any party
/// unconditionally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DadosParte {
    pub nome: String,
    pub fantasia: String,
    pub ie: String,
    pub ie_st: String,
    pub inscricao_municipal: String,
    /// National identifier, masked as CPF or CNPJ by digit count.
    pub inscricao_nacional: String,
    pub telefone: String,
    pub endereco: String,
    pub numero: String,
    pub complemento: String,
    pub bairro: String,
    pub municipio: String,
    pub cep: String,
    pub uf: String,
}

impl DadosParte {
    /// Flatten a document party into its template record.
    pub fn from_parte(parte: Option<&Parte>) -> Self {
        let mut dados = Self::default();
        let Some(parte) = parte else {
            return dados;
        };
        dados.nome = parte.nome.clone();
        dados.fantasia = parte.fantasia.clone();
        dados.ie = parte.inscricao_estadual.clone();
        dados.ie_st = parte.inscricao_estadual_st.clone();
        dados.inscricao_municipal = parte.inscricao_municipal.clone();
        dados.inscricao_nacional = format_cpf_cnpj(&parte.inscricao_nacional);
        dados.telefone = parte.telefone.clone();
        if let Some(endereco) = &parte.endereco {
            dados.endereco = endereco.logradouro.clone();
            dados.numero = endereco.numero.clone();
            dados.complemento = endereco.complemento.clone();
            dados.bairro = endereco.bairro.clone();
            dados.municipio = endereco.municipio.clone();
            dados.cep = endereco.cep.clone();
            dados.uf = endereco.uf.clone();
        }
        dados
    }
}

/// One row of the DANFE product table, fully formatted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DadosItem {
    pub codigo: String,
    pub descricao: String,
    pub ncm: String,
    /// Origin digit concatenated with the tax situation code.
    pub cst: String,
    pub cfop: String,
    pub unidade: String,
    pub quantidade: String,
    pub valor: String,
    pub desconto: String,
    pub total: String,
    pub base_calculo: String,
    pub icms: String,
    pub ipi: String,
    pub porcentagem_icms: String,
    pub porcentagem_ipi: String,
}

/// One row of the DANFE installment (duplicata) box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DadosDuplicata {
    pub numero: String,
    pub vencimento: String,
    pub valor: String,
}

/// Cargo volume block, present only when the document carries one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DadosVolume {
    pub volume_quantidade: String,
    pub volume_especie: String,
    pub volume_marca: String,
    pub volume_numeracao: String,
    pub volume_peso_bruto: String,
    pub volume_peso_liquido: String,
}

/// Transport vehicle block, present only when the document carries one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DadosVeiculo {
    pub veiculo_placa: String,
    pub veiculo_placa_uf: String,
    pub veiculo_antt: String,
}

/// ISSQN service-tax block, present only when the document carries one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DadosServico {
    pub total_servico: String,
    pub total_issqn: String,
    pub base_calculo_issqn: String,
}

/// The complete, flat template context for one DANFE.
///
/// Built fresh per document and consumed once by the renderer. The three
/// optional blocks flatten their keys in only when present, so the
/// template's `{{#if}}` guards see the keys themselves appear and
/// disappear.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateData {
    pub operacao: String,
    pub natureza: String,
    pub numero: String,
    pub serie: String,
    pub chave: String,
    pub protocolo: String,
    pub data_protocolo: String,
    pub destinatario: DadosParte,
    pub emitente: DadosParte,
    pub data_emissao: String,
    pub data_saida: String,
    pub base_calculo_icms: String,
    pub imposto_icms: String,
    pub base_calculo_icms_st: String,
    pub imposto_icms_st: String,
    pub imposto_tributos: String,
    pub total_produtos: String,
    pub total_frete: String,
    pub total_seguro: String,
    pub total_desconto: String,
    pub total_despesas: String,
    pub total_ipi: String,
    pub total_nota: String,
    pub transportador: DadosParte,
    pub informacoes_fisco: String,
    pub informacoes_complementares: String,
    pub observacao: String,
    pub modalidade_frete: String,
    pub modalidade_frete_texto: String,
    pub itens: Vec<DadosItem>,
    pub duplicatas: Vec<DadosDuplicata>,
    #[serde(flatten)]
    pub volume: Option<DadosVolume>,
    #[serde(flatten)]
    pub veiculo: Option<DadosVeiculo>,
    #[serde(flatten)]
    pub servico: Option<DadosServico>,
}

impl TemplateData {
    /// Assemble the template context for a parsed document.
    pub fn from_nfe(nfe: &Nfe) -> Self {
        let recebimento = nfe
            .protocolo
            .as_ref()
            .map(|p| p.data_recebimento.as_str())
            .unwrap_or_default();
        let total = &nfe.total;

        TemplateData {
            operacao: nfe.ide.tipo_operacao.clone(),
            natureza: nfe.ide.natureza_operacao.clone(),
            numero: nfe.ide.numero.clone(),
            serie: nfe.ide.serie.clone(),
            chave: format_chave(&nfe.chave),
            protocolo: nfe
                .protocolo
                .as_ref()
                .map(|p| p.numero.clone())
                .unwrap_or_default(),
            data_protocolo: format!(
                "{} {}",
                format_data(recebimento),
                format_hora(recebimento)
            ),
            destinatario: DadosParte::from_parte(nfe.destinatario.as_ref()),
            emitente: DadosParte::from_parte(nfe.emitente.as_ref()),
            data_emissao: format_data(&nfe.ide.data_emissao),
            data_saida: format_data(&nfe.ide.data_saida),
            base_calculo_icms: format_currency_with(total.base_calculo_icms, 2),
            imposto_icms: format_currency_with(total.valor_icms, 2),
            base_calculo_icms_st: format_currency_with(total.base_calculo_icms_st, 2),
            imposto_icms_st: format_currency_with(total.valor_icms_st, 2),
            imposto_tributos: format_currency_with(total.valor_total_tributos, 2),
            total_produtos: format_currency_with(total.valor_produtos, 2),
            total_frete: format_currency_with(total.valor_frete, 2),
            total_seguro: format_currency_with(total.valor_seguro, 2),
            total_desconto: format_currency_with(total.valor_desconto, 2),
            total_despesas: format_currency_with(total.valor_outras_despesas, 2),
            total_ipi: format_currency_with(total.valor_ipi, 2),
            total_nota: format_currency_with(total.valor_nota, 2),
            transportador: DadosParte::from_parte(nfe.transporte.transportador.as_ref()),
            informacoes_fisco: nfe.informacoes.fisco.clone(),
            informacoes_complementares: nfe.informacoes.complementares.clone(),
            observacao: observacoes(nfe),
            modalidade_frete: nfe
                .transporte
                .modalidade_frete
                .map(|m| m.code().to_string())
                .unwrap_or_default(),
            modalidade_frete_texto: nfe
                .transporte
                .modalidade_frete
                .map(|m| m.texto().to_string())
                .unwrap_or_default(),
            itens: dados_itens(nfe),
            duplicatas: dados_duplicatas(nfe),
            volume: nfe.transporte.volume.as_ref().map(|v| DadosVolume {
                volume_quantidade: format_currency(v.quantidade),
                volume_especie: v.especie.clone(),
                volume_marca: v.marca.clone(),
                volume_numeracao: v.numeracao.clone(),
                volume_peso_bruto: format_currency(v.peso_bruto),
                volume_peso_liquido: format_currency(v.peso_liquido),
            }),
            veiculo: nfe.transporte.veiculo.as_ref().map(|v| DadosVeiculo {
                veiculo_placa: v.placa.clone(),
                veiculo_placa_uf: v.uf.clone(),
                veiculo_antt: v.rntc.clone(),
            }),
            servico: nfe.servico.as_ref().map(|s| DadosServico {
                total_servico: format_currency(s.valor_servicos),
                total_issqn: format_currency(s.valor_iss),
                base_calculo_issqn: format_currency(s.base_calculo),
            }),
        }
    }
}

/// Product table rows, in document order.
fn dados_itens(nfe: &Nfe) -> Vec<DadosItem> {
    nfe.itens
        .iter()
        .map(|item| DadosItem {
            codigo: item.codigo.clone(),
            descricao: item.descricao.clone(),
            ncm: item.ncm.clone(),
            cst: format!("{}{}", item.origem, item.cst),
            cfop: item.cfop.clone(),
            unidade: item.unidade.clone(),
            quantidade: format_currency(item.quantidade),
            valor: format_currency(item.valor_unitario),
            desconto: format_currency(item.valor_desconto),
            total: format_currency(item.valor_total),
            base_calculo: format_currency(item.base_calculo_icms),
            icms: format_currency(item.valor_icms),
            ipi: format_currency(item.valor_ipi),
            porcentagem_icms: format_currency_with(item.porcentagem_icms, 2),
            porcentagem_ipi: format_currency_with(item.porcentagem_ipi, 2),
        })
        .collect()
}

/// Installment rows; an absent billing block yields an empty sequence.
fn dados_duplicatas(nfe: &Nfe) -> Vec<DadosDuplicata> {
    let Some(cobranca) = &nfe.cobranca else {
        return Vec::new();
    };
    cobranca
        .duplicatas
        .iter()
        .map(|dup| DadosDuplicata {
            numero: dup.numero.clone(),
            vencimento: format_data(&dup.vencimento),
            valor: format_currency_with(dup.valor, 2),
        })
        .collect()
}

/// Taxpayer notes concatenated in document order, each preceded by a
/// newline; no notes yields the empty string.
fn observacoes(nfe: &Nfe) -> String {
    let mut out = String::new();
    for texto in &nfe.informacoes.observacoes {
        out.push('\n');
        out.push_str(texto);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfe::{Cobranca, Duplicata, Endereco, Item};
    use rust_decimal_macros::dec;

    #[test]
    fn absent_parte_maps_to_empty_record() {
        assert_eq!(DadosParte::from_parte(None), DadosParte::default());
    }

    #[test]
    fn parte_without_endereco_keeps_address_fields_empty() {
        let parte = Parte {
            nome: "ACME Ltda".into(),
            inscricao_nacional: "12345678000195".into(),
            ..Parte::default()
        };
        let dados = DadosParte::from_parte(Some(&parte));
        assert_eq!(dados.nome, "ACME Ltda");
        assert_eq!(dados.inscricao_nacional, "12.345.678/0001-95");
        assert_eq!(dados.endereco, "");
        assert_eq!(dados.uf, "");
    }

    #[test]
    fn parte_with_endereco_merges_address_fields() {
        let parte = Parte {
            nome: "ACME Ltda".into(),
            endereco: Some(Endereco {
                logradouro: "Rua das Flores".into(),
                numero: "100".into(),
                municipio: "São Paulo".into(),
                uf: "SP".into(),
                ..Endereco::default()
            }),
            ..Parte::default()
        };
        let dados = DadosParte::from_parte(Some(&parte));
        assert_eq!(dados.endereco, "Rua das Flores");
        assert_eq!(dados.numero, "100");
        assert_eq!(dados.municipio, "São Paulo");
        assert_eq!(dados.uf, "SP");
    }

    #[test]
    fn item_situation_code_is_string_concatenation() {
        let mut nfe = Nfe::default();
        nfe.itens.push(Item {
            origem: "0".into(),
            cst: "00".into(),
            ..Item::default()
        });
        let dados = TemplateData::from_nfe(&nfe);
        assert_eq!(dados.itens[0].cst, "000");
    }

    #[test]
    fn empty_document_has_present_but_empty_sequences() {
        let dados = TemplateData::from_nfe(&Nfe::default());
        assert!(dados.itens.is_empty());
        assert!(dados.duplicatas.is_empty());
        assert_eq!(dados.observacao, "");
        assert_eq!(dados.data_protocolo, " ");
        assert_eq!(dados.destinatario, DadosParte::default());
    }

    #[test]
    fn duplicatas_are_formatted() {
        let mut nfe = Nfe::default();
        nfe.cobranca = Some(Cobranca {
            duplicatas: vec![Duplicata {
                numero: "001".into(),
                vencimento: "2023-06-04".into(),
                valor: dec!(1234.5),
            }],
        });
        let dados = TemplateData::from_nfe(&nfe);
        assert_eq!(dados.duplicatas.len(), 1);
        assert_eq!(dados.duplicatas[0].vencimento, "04/06/2023");
        assert_eq!(dados.duplicatas[0].valor, "1.234,50");
    }

    #[test]
    fn observacao_prefixes_each_note_with_newline() {
        let mut nfe = Nfe::default();
        nfe.informacoes.observacoes = vec!["primeira".into(), "segunda".into()];
        let dados = TemplateData::from_nfe(&nfe);
        assert_eq!(dados.observacao, "\nprimeira\nsegunda");
    }

    #[test]
    fn conditional_blocks_are_flattened_only_when_present() {
        let json = serde_json::to_value(TemplateData::from_nfe(&Nfe::default())).unwrap();
        assert!(json.get("volume_quantidade").is_none());
        assert!(json.get("veiculo_placa").is_none());
        assert!(json.get("total_servico").is_none());

        let mut nfe = Nfe::default();
        nfe.transporte.veiculo = Some(crate::nfe::Veiculo {
            placa: "ABC1D23".into(),
            uf: "SP".into(),
            rntc: "123456".into(),
        });
        let json = serde_json::to_value(TemplateData::from_nfe(&nfe)).unwrap();
        assert_eq!(json["veiculo_placa"], "ABC1D23");
        assert_eq!(json["veiculo_placa_uf"], "SP");
        assert!(json.get("volume_quantidade").is_none());
    }
}
