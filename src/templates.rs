//! Sample contract HTML for testing and demonstration.
//!
//! Each template exercises a different part of the extractor and composer.

/// The smallest realistic contract: a title and two headed sections.
pub fn minimal_contract() -> &'static str {
    "<html><head><title>Contrato #123</title></head><body>\
     <h1>OBJETO</h1><p>Texto do objeto.</p>\
     <h2>VALOR</h2><p>R$ 100,00</p>\
     </body></html>"
}

/// Service agreement with mixed heading levels, inline markup, entities and
/// the script/style noise editors tend to leave behind.
pub fn service_agreement() -> &'static str {
    r##"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="utf-8">
    <title>Contrato de Presta&ccedil;&atilde;o de Servi&ccedil;os</title>
    <style>
        h1 { font-size: 20px; }
        .clausula { margin-bottom: 8px; }
    </style>
    <script>window.__editor = { version: "<h1>não é título</h1>" };</script>
</head>
<body>
    <!-- <h1>Rascunho removido</h1> -->
    <h1>CLÁUSULA PRIMEIRA &ndash; DO OBJETO</h1>
    <p class="clausula">
        O presente contrato tem por objeto a prestação de serviços de
        <strong>consultoria em tecnologia</strong> pela CONTRATADA à CONTRATANTE,
        conforme escopo descrito no Anexo I.
    </p>

    <h2>CLÁUSULA SEGUNDA &ndash; DO PREÇO</h2>
    <p>Pelos serviços a CONTRATANTE pagará o valor mensal de <b>R$&nbsp;12.500,00</b>.</p>
    <table>
        <tr><th>Parcela</th><th>Vencimento</th></tr>
        <tr><td>1ª</td><td>10/01</td></tr>
        <tr><td>2ª</td><td>10/02</td></tr>
    </table>

    <h3>Parágrafo único</h3>
    <p>O atraso implica multa de 2% e juros de 1% ao mês.</p>

    <h2>CLÁUSULA TERCEIRA &ndash; DA VIGÊNCIA</h2>
    <p>Este contrato vigora por 12 (doze) meses a partir da assinatura.</p>

    <h4>Foro</h4>
    <p>Fica eleito o foro da comarca de São Paulo/SP.</p>
</body>
</html>"##
}

/// Terms without any heading tags; the extractor must synthesise a section.
pub fn unheaded_terms() -> &'static str {
    r#"<html><head><title>Termo de Aceite</title></head>
<body>
    <p>Declaro que li e aceito os termos de uso.</p>
    <p>Assinatura: ______________________</p>
</body></html>"#
}

/// One clause with `paragraphs` short paragraphs, closed by a signature
/// section. The closing heading bounds the clause's content; without it the
/// last heading would be cut at `TRAILING_CONTENT_CHARS` and fit on one page.
/// Counts above roughly 50 force pagination.
pub fn long_clause(paragraphs: usize) -> String {
    let mut html = String::from(
        "<html><head><title>Contrato Extenso</title></head><body><h1>DISPOSIÇÕES GERAIS</h1>",
    );
    for i in 1..=paragraphs {
        html.push_str(&format!(
            "<p>Item {i}: as partes declaram ciência das condições deste instrumento.</p>"
        ));
    }
    html.push_str("<h2>ASSINATURAS</h2><p>CONTRATANTE ____________ CONTRATADA ____________</p>");
    html.push_str("</body></html>");
    html
}
