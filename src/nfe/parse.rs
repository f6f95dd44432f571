use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal::Decimal;

use super::types::*;
use crate::error::DanfeError;

/// Parse an NFe XML document into an [`Nfe`].
///
/// Accepts the bare `<NFe>` element as well as the `<nfeProc>` authorization
/// envelope; namespace prefixes are ignored. Malformed XML is an error; a
/// well-formed document that simply lacks NFe content parses to an empty
/// model.
pub fn parse(xml: &str) -> Result<Nfe, DanfeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut p = NfeParser::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "infNFe" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"Id" {
                            let id = String::from_utf8_lossy(&attr.value).to_string();
                            p.nfe.chave = id.strip_prefix("NFe").unwrap_or(&id).to_string();
                        }
                    }
                }
                p.handle_start(&name);
                p.path.push(name);
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                if !text.is_empty() {
                    p.handle_text(&text);
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                if !text.is_empty() {
                    p.handle_text(&text);
                }
            }
            Ok(Event::End(_)) => p.handle_end(),
            Ok(Event::Eof) => {
                if let Some(open) = p.path.last() {
                    return Err(DanfeError::Xml(format!(
                        "unexpected end of document: <{open}> is not closed"
                    )));
                }
                break;
            }
            Err(e) => return Err(DanfeError::Xml(e.to_string())),
            _ => {}
        }
    }

    log::debug!(
        "parsed NFe {}: {} item(s), {} installment(s)",
        p.nfe.ide.numero,
        p.nfe.itens.len(),
        p.nfe
            .cobranca
            .as_ref()
            .map(|c| c.duplicatas.len())
            .unwrap_or(0)
    );
    Ok(p.nfe)
}

/// Numeric NFe text with the boundary rule: absent or malformed values
/// become zero.
fn parse_decimal(text: &str) -> Decimal {
    Decimal::from_str(text.trim()).unwrap_or_default()
}

#[derive(Default)]
struct NfeParser {
    nfe: Nfe,
    path: Vec<String>,
    item: Option<Item>,
    duplicata: Option<Duplicata>,
    /// 1-based index of the `vol` element being read; only the first one
    /// feeds the model (the DANFE volume box shows a single volume).
    vol_atual: usize,
}

impl NfeParser {
    fn within(&self, name: &str) -> bool {
        self.path.iter().any(|p| p == name)
    }

    fn handle_start(&mut self, name: &str) {
        match name {
            "det" => self.item = Some(Item::default()),
            "dup" => self.duplicata = Some(Duplicata::default()),
            "emit" => self.nfe.emitente = Some(Parte::default()),
            "dest" => self.nfe.destinatario = Some(Parte::default()),
            "transporta" => self.nfe.transporte.transportador = Some(Parte::default()),
            "veicTransp" => self.nfe.transporte.veiculo = Some(Veiculo::default()),
            "vol" => {
                self.vol_atual += 1;
                if self.vol_atual == 1 {
                    self.nfe.transporte.volume = Some(Volume::default());
                }
            }
            "ISSQNtot" => self.nfe.servico = Some(TotaisServico::default()),
            "cobr" => self.nfe.cobranca = Some(Cobranca::default()),
            _ => {}
        }
    }

    fn handle_end(&mut self) {
        let ended = self.path.pop().unwrap_or_default();
        match ended.as_str() {
            "det" => {
                if let Some(item) = self.item.take() {
                    self.nfe.itens.push(item);
                }
            }
            "dup" => {
                if let (Some(dup), Some(cobranca)) =
                    (self.duplicata.take(), self.nfe.cobranca.as_mut())
                {
                    cobranca.duplicatas.push(dup);
                }
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        let leaf = match self.path.last() {
            Some(l) => l.clone(),
            None => return,
        };

        // Vehicle and volume live inside `transp` but outside `transporta`,
        // so they are routed before the party contexts.
        if self.within("veicTransp") {
            if let Some(v) = self.nfe.transporte.veiculo.as_mut() {
                match leaf.as_str() {
                    "placa" => v.placa = text.into(),
                    "UF" => v.uf = text.into(),
                    "RNTC" => v.rntc = text.into(),
                    _ => {}
                }
            }
            return;
        }
        if self.within("vol") {
            if self.vol_atual == 1 {
                if let Some(v) = self.nfe.transporte.volume.as_mut() {
                    match leaf.as_str() {
                        "qVol" => v.quantidade = parse_decimal(text),
                        "esp" => v.especie = text.into(),
                        "marca" => v.marca = text.into(),
                        "nVol" => v.numeracao = text.into(),
                        "pesoL" => v.peso_liquido = parse_decimal(text),
                        "pesoB" => v.peso_bruto = parse_decimal(text),
                        _ => {}
                    }
                }
            }
            return;
        }

        if self.within("det") {
            self.item_text(&leaf, text);
            return;
        }

        if let Some(parte) = self.current_parte() {
            match leaf.as_str() {
                "xNome" => parte.nome = text.into(),
                "xFant" => parte.fantasia = text.into(),
                "IE" => parte.inscricao_estadual = text.into(),
                "IEST" => parte.inscricao_estadual_st = text.into(),
                "IM" => parte.inscricao_municipal = text.into(),
                "CNPJ" | "CPF" => parte.inscricao_nacional = text.into(),
                "fone" => parte.telefone = text.into(),
                "xLgr" | "xEnder" => ender(parte).logradouro = text.into(),
                "nro" => ender(parte).numero = text.into(),
                "xCpl" => ender(parte).complemento = text.into(),
                "xBairro" => ender(parte).bairro = text.into(),
                "xMun" => ender(parte).municipio = text.into(),
                "CEP" => ender(parte).cep = text.into(),
                "UF" => ender(parte).uf = text.into(),
                _ => {}
            }
            return;
        }

        if self.within("ICMSTot") {
            let total = &mut self.nfe.total;
            match leaf.as_str() {
                "vBC" => total.base_calculo_icms = parse_decimal(text),
                "vICMS" => total.valor_icms = parse_decimal(text),
                "vBCST" => total.base_calculo_icms_st = parse_decimal(text),
                "vST" => total.valor_icms_st = parse_decimal(text),
                "vTotTrib" => total.valor_total_tributos = parse_decimal(text),
                "vProd" => total.valor_produtos = parse_decimal(text),
                "vFrete" => total.valor_frete = parse_decimal(text),
                "vSeg" => total.valor_seguro = parse_decimal(text),
                "vDesc" => total.valor_desconto = parse_decimal(text),
                "vOutro" => total.valor_outras_despesas = parse_decimal(text),
                "vIPI" => total.valor_ipi = parse_decimal(text),
                "vNF" => total.valor_nota = parse_decimal(text),
                _ => {}
            }
            return;
        }
        if self.within("ISSQNtot") {
            if let Some(s) = self.nfe.servico.as_mut() {
                match leaf.as_str() {
                    "vServ" => s.valor_servicos = parse_decimal(text),
                    "vISS" => s.valor_iss = parse_decimal(text),
                    "vBC" => s.base_calculo = parse_decimal(text),
                    _ => {}
                }
            }
            return;
        }

        if self.within("dup") {
            if let Some(d) = self.duplicata.as_mut() {
                match leaf.as_str() {
                    "nDup" => d.numero = text.into(),
                    "dVenc" => d.vencimento = text.into(),
                    "vDup" => d.valor = parse_decimal(text),
                    _ => {}
                }
            }
            return;
        }
        if self.within("obsCont") {
            if leaf == "xTexto" {
                self.nfe.informacoes.observacoes.push(text.into());
            }
            return;
        }

        match leaf.as_str() {
            "tpNF" => self.nfe.ide.tipo_operacao = text.into(),
            "natOp" => self.nfe.ide.natureza_operacao = text.into(),
            // `nNF`/`serie` reappear under referenced-document blocks.
            "nNF" if self.within("ide") && !self.within("NFref") => {
                self.nfe.ide.numero = text.into()
            }
            "serie" if self.within("ide") && !self.within("NFref") => {
                self.nfe.ide.serie = text.into()
            }
            "dhEmi" | "dEmi" => self.nfe.ide.data_emissao = text.into(),
            "dhSaiEnt" | "dSaiEnt" => self.nfe.ide.data_saida = text.into(),
            "modFrete" => {
                self.nfe.transporte.modalidade_frete = ModalidadeFrete::from_code(text)
            }
            "infAdFisco" => self.nfe.informacoes.fisco = text.into(),
            "infCpl" => self.nfe.informacoes.complementares = text.into(),
            "nProt" if self.within("infProt") => {
                self.protocolo().numero = text.into();
            }
            "dhRecbto" if self.within("infProt") => {
                self.protocolo().data_recebimento = text.into();
            }
            // Fallback when the bare `<NFe>` had no `Id` attribute.
            "chNFe" if self.within("infProt") && self.nfe.chave.is_empty() => {
                self.nfe.chave = text.into();
            }
            _ => {}
        }
    }

    fn item_text(&mut self, leaf: &str, text: &str) {
        let in_prod = self.within("prod");
        let in_icms = self.within("ICMS");
        let in_ipi = self.within("IPI");
        let Some(item) = self.item.as_mut() else {
            return;
        };
        if in_prod {
            match leaf {
                "cProd" => item.codigo = text.into(),
                "xProd" => item.descricao = text.into(),
                "NCM" => item.ncm = text.into(),
                "CFOP" => item.cfop = text.into(),
                "uCom" => item.unidade = text.into(),
                "qCom" => item.quantidade = parse_decimal(text),
                "vUnCom" => item.valor_unitario = parse_decimal(text),
                "vDesc" => item.valor_desconto = parse_decimal(text),
                "vProd" => item.valor_total = parse_decimal(text),
                _ => {}
            }
        } else if in_icms {
            // Only the ICMS group feeds the DANFE item columns; the CST of
            // PIS/COFINS never reaches this branch.
            match leaf {
                "orig" => item.origem = text.into(),
                "CST" | "CSOSN" => item.cst = text.into(),
                "vBC" => item.base_calculo_icms = parse_decimal(text),
                "vICMS" => item.valor_icms = parse_decimal(text),
                "pICMS" => item.porcentagem_icms = parse_decimal(text),
                _ => {}
            }
        } else if in_ipi {
            match leaf {
                "vIPI" => item.valor_ipi = parse_decimal(text),
                "pIPI" => item.porcentagem_ipi = parse_decimal(text),
                _ => {}
            }
        }
    }

    fn current_parte(&mut self) -> Option<&mut Parte> {
        if self.within("emit") {
            self.nfe.emitente.as_mut()
        } else if self.within("dest") {
            self.nfe.destinatario.as_mut()
        } else if self.within("transporta") {
            self.nfe.transporte.transportador.as_mut()
        } else {
            None
        }
    }

    fn protocolo(&mut self) -> &mut Protocolo {
        self.nfe.protocolo.get_or_insert_with(Protocolo::default)
    }
}

fn ender(parte: &mut Parte) -> &mut Endereco {
    parte.endereco.get_or_insert_with(Endereco::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(matches!(parse("<NFe><ide>"), Err(DanfeError::Xml(_))));
    }

    #[test]
    fn non_nfe_document_parses_empty() {
        let nfe = parse("<relatorio><linha>1</linha></relatorio>").unwrap();
        assert!(nfe.chave.is_empty());
        assert!(nfe.itens.is_empty());
        assert!(nfe.emitente.is_none());
    }

    #[test]
    fn decimal_fallback_is_zero() {
        assert_eq!(parse_decimal("10.55"), Decimal::new(1055, 2));
        assert_eq!(parse_decimal(""), Decimal::ZERO);
        assert_eq!(parse_decimal("abc"), Decimal::ZERO);
    }
}
