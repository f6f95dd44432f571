use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A parsed NFe document (layout 3.10 / 4.00).
///
/// Field-bearing blocks that the layout marks optional are `Option`s;
/// everything else defaults to empty so a sparse document still maps to a
/// complete (if mostly blank) DANFE. Monetary and quantity fields are
/// [`Decimal`] — absent or malformed numeric text parses to zero at the
/// XML boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Nfe {
    /// 44-digit access key, from the `Id` attribute of `infNFe`
    /// (`chNFe` in the authorization protocol as fallback).
    pub chave: String,
    /// `ide` — document identification block.
    pub ide: Identificacao,
    /// `emit` — issuer.
    pub emitente: Option<Parte>,
    /// `dest` — recipient.
    pub destinatario: Option<Parte>,
    /// `det` — line items, in document order.
    pub itens: Vec<Item>,
    /// `total/ICMSTot` — document totals.
    pub total: Totais,
    /// `total/ISSQNtot` — service-tax totals, when the invoice has
    /// municipal-tax services.
    pub servico: Option<TotaisServico>,
    /// `transp` — freight block.
    pub transporte: Transporte,
    /// `cobr` — billing block with the installment records.
    pub cobranca: Option<Cobranca>,
    /// `infAdic` — free-text additional information.
    pub informacoes: InformacoesAdicionais,
    /// `protNFe/infProt` — authorization protocol.
    pub protocolo: Option<Protocolo>,
}

/// `ide` — identification of the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Identificacao {
    /// `tpNF` — operation type code (0 entrada, 1 saída).
    pub tipo_operacao: String,
    /// `natOp` — nature of the operation.
    pub natureza_operacao: String,
    /// `nNF` — invoice number.
    pub numero: String,
    /// `serie` — invoice series.
    pub serie: String,
    /// `dhEmi` (4.00) or `dEmi` (3.10) — emission timestamp, verbatim.
    pub data_emissao: String,
    /// `dhSaiEnt` / `dSaiEnt` — exit/entry timestamp, verbatim.
    pub data_saida: String,
}

/// A party on the document: issuer (`emit`), recipient (`dest`) or
/// carrier (`transporta`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parte {
    /// `xNome` — registered name.
    pub nome: String,
    /// `xFant` — trade name.
    pub fantasia: String,
    /// `IE` — state registration.
    pub inscricao_estadual: String,
    /// `IEST` — state registration as tax substitute.
    pub inscricao_estadual_st: String,
    /// `IM` — municipal registration.
    pub inscricao_municipal: String,
    /// `CNPJ` or `CPF` — national identifier digits, unmasked.
    pub inscricao_nacional: String,
    /// `fone` — phone number.
    pub telefone: String,
    /// `enderEmit` / `enderDest`, or the carrier's inline address fields.
    pub endereco: Option<Endereco>,
}

/// Postal address of a [`Parte`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endereco {
    /// `xLgr` — street (`xEnder` for the carrier).
    pub logradouro: String,
    /// `nro` — number.
    pub numero: String,
    /// `xCpl` — complement.
    pub complemento: String,
    /// `xBairro` — district.
    pub bairro: String,
    /// `xMun` — municipality.
    pub municipio: String,
    /// `CEP` — postal code.
    pub cep: String,
    /// `UF` — state code.
    pub uf: String,
}

/// `det` — one invoice line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    /// `prod/cProd` — product code.
    pub codigo: String,
    /// `prod/xProd` — description.
    pub descricao: String,
    /// `prod/NCM` — tax classification code.
    pub ncm: String,
    /// `prod/CFOP` — operation code.
    pub cfop: String,
    /// `prod/uCom` — commercial unit.
    pub unidade: String,
    /// ICMS `orig` — merchandise origin digit.
    pub origem: String,
    /// ICMS `CST` (or `CSOSN` under Simples Nacional) — tax situation code.
    pub cst: String,
    /// `prod/qCom` — commercial quantity.
    pub quantidade: Decimal,
    /// `prod/vUnCom` — unit value.
    pub valor_unitario: Decimal,
    /// `prod/vDesc` — discount value.
    pub valor_desconto: Decimal,
    /// `prod/vProd` — gross line total.
    pub valor_total: Decimal,
    /// ICMS `vBC` — ICMS calculation base.
    pub base_calculo_icms: Decimal,
    /// ICMS `vICMS` — ICMS value.
    pub valor_icms: Decimal,
    /// IPI `vIPI` — IPI value.
    pub valor_ipi: Decimal,
    /// ICMS `pICMS` — ICMS rate percentage.
    pub porcentagem_icms: Decimal,
    /// IPI `pIPI` — IPI rate percentage.
    pub porcentagem_ipi: Decimal,
}

/// `total/ICMSTot` — document-level totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Totais {
    /// `vBC` — ICMS calculation base.
    pub base_calculo_icms: Decimal,
    /// `vICMS` — total ICMS.
    pub valor_icms: Decimal,
    /// `vBCST` — ICMS-ST calculation base.
    pub base_calculo_icms_st: Decimal,
    /// `vST` — total ICMS-ST.
    pub valor_icms_st: Decimal,
    /// `vTotTrib` — approximate total tax burden.
    pub valor_total_tributos: Decimal,
    /// `vProd` — products total.
    pub valor_produtos: Decimal,
    /// `vFrete` — freight total.
    pub valor_frete: Decimal,
    /// `vSeg` — insurance total.
    pub valor_seguro: Decimal,
    /// `vDesc` — discount total.
    pub valor_desconto: Decimal,
    /// `vOutro` — other accessory expenses.
    pub valor_outras_despesas: Decimal,
    /// `vIPI` — total IPI.
    pub valor_ipi: Decimal,
    /// `vNF` — invoice grand total.
    pub valor_nota: Decimal,
}

/// `total/ISSQNtot` — service-tax totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TotaisServico {
    /// `vServ` — total of services outside ICMS incidence.
    pub valor_servicos: Decimal,
    /// `vISS` — total ISSQN.
    pub valor_iss: Decimal,
    /// `vBC` — ISSQN calculation base.
    pub base_calculo: Decimal,
}

/// `transp` — freight block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transporte {
    /// `modFrete` — freight mode.
    pub modalidade_frete: Option<ModalidadeFrete>,
    /// `transporta` — carrier party.
    pub transportador: Option<Parte>,
    /// `veicTransp` — transport vehicle.
    pub veiculo: Option<Veiculo>,
    /// `vol` — cargo volume (the first, when the document lists several).
    pub volume: Option<Volume>,
}

/// `modFrete` — who contracts the freight (layout 4.00 code table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalidadeFrete {
    /// 0 — contracted by the sender (CIF).
    Remetente,
    /// 1 — contracted by the recipient (FOB).
    Destinatario,
    /// 2 — contracted by a third party.
    Terceiros,
    /// 3 — sender's own transport.
    ProprioRemetente,
    /// 4 — recipient's own transport.
    ProprioDestinatario,
    /// 9 — no transport.
    SemTransporte,
}

impl ModalidadeFrete {
    /// `modFrete` code digit.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Remetente => "0",
            Self::Destinatario => "1",
            Self::Terceiros => "2",
            Self::ProprioRemetente => "3",
            Self::ProprioDestinatario => "4",
            Self::SemTransporte => "9",
        }
    }

    /// Parse from the `modFrete` code digit.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::Remetente),
            "1" => Some(Self::Destinatario),
            "2" => Some(Self::Terceiros),
            "3" => Some(Self::ProprioRemetente),
            "4" => Some(Self::ProprioDestinatario),
            "9" => Some(Self::SemTransporte),
            _ => None,
        }
    }

    /// Label printed in the DANFE freight box.
    pub fn texto(&self) -> &'static str {
        match self {
            Self::Remetente => "Por conta do remetente (CIF)",
            Self::Destinatario => "Por conta do destinatário (FOB)",
            Self::Terceiros => "Por conta de terceiros",
            Self::ProprioRemetente => "Transporte próprio do remetente",
            Self::ProprioDestinatario => "Transporte próprio do destinatário",
            Self::SemTransporte => "Sem ocorrência de transporte",
        }
    }
}

/// `veicTransp` — transport vehicle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Veiculo {
    /// `placa` — license plate.
    pub placa: String,
    /// `UF` — plate state.
    pub uf: String,
    /// `RNTC` — ANTT carrier registration.
    pub rntc: String,
}

/// `vol` — cargo volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Volume {
    /// `qVol` — volume count.
    pub quantidade: Decimal,
    /// `esp` — kind of package.
    pub especie: String,
    /// `marca` — brand.
    pub marca: String,
    /// `nVol` — numbering.
    pub numeracao: String,
    /// `pesoL` — net weight (kg).
    pub peso_liquido: Decimal,
    /// `pesoB` — gross weight (kg).
    pub peso_bruto: Decimal,
}

/// `cobr` — billing block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cobranca {
    /// `dup` — installment records, in document order.
    pub duplicatas: Vec<Duplicata>,
}

/// `dup` — one installment (duplicata).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Duplicata {
    /// `nDup` — installment number.
    pub numero: String,
    /// `dVenc` — due date, verbatim.
    pub vencimento: String,
    /// `vDup` — installment value.
    pub valor: Decimal,
}

/// `infAdic` — free-text additional information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InformacoesAdicionais {
    /// `infAdFisco` — information of interest to the tax authority.
    pub fisco: String,
    /// `infCpl` — complementary information.
    pub complementares: String,
    /// `obsCont/xTexto` — taxpayer note texts, in document order.
    pub observacoes: Vec<String>,
}

/// `protNFe/infProt` — authorization protocol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Protocolo {
    /// `nProt` — protocol number.
    pub numero: String,
    /// `dhRecbto` — reception timestamp, verbatim.
    pub data_recebimento: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modalidade_frete_codes_roundtrip() {
        for modalidade in [
            ModalidadeFrete::Remetente,
            ModalidadeFrete::Destinatario,
            ModalidadeFrete::Terceiros,
            ModalidadeFrete::ProprioRemetente,
            ModalidadeFrete::ProprioDestinatario,
            ModalidadeFrete::SemTransporte,
        ] {
            assert_eq!(ModalidadeFrete::from_code(modalidade.code()), Some(modalidade));
        }
    }

    #[test]
    fn modalidade_frete_unknown_code() {
        assert_eq!(ModalidadeFrete::from_code("7"), None);
        assert_eq!(ModalidadeFrete::from_code(""), None);
    }
}
