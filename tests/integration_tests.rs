//! Integration tests for papers-fetcher
//!
//! These tests run whole queries through the pipeline against a mock source and
//! against the PubMed source pointed at a local mock HTTP server.

use papers_fetcher::config::PubMedConfig;
use papers_fetcher::models::{FetchBatch, RawAuthorEntry, RawPaperRecord, SearchQuery};
use papers_fetcher::output::{read_csv, ConsoleFormat};
use papers_fetcher::pipeline::{fetch_and_classify, run, Destination, PipelineError};
use papers_fetcher::sources::mock::make_record;
use papers_fetcher::sources::{MockSource, PubMedSource, Source, SourceError};

/// Five fixed records: two with company authors, three purely academic
fn diabetes_records() -> Vec<RawPaperRecord> {
    vec![
        make_record(
            "101",
            "Beta cell regeneration in type 1 diabetes",
            &[("Alice Smith", "Department of Medicine, Harvard University")],
        ),
        RawPaperRecord::new("102", "Oral GLP-1 receptor agonists: a phase 3 trial", "2023")
            .author(RawAuthorEntry::new("Bob Jones").affiliation("Joslin Diabetes Center, Boston"))
            .author(
                RawAuthorEntry::new("Carla Diaz")
                    .affiliation("Novo Nordisk Pharma Ltd, Bagsvaerd, Denmark")
                    .email("cdiaz@novo.example")
                    .corresponding(true),
            )
            .author(
                RawAuthorEntry::new("Dan Wu")
                    .affiliation("Novo Nordisk Pharma Ltd, Bagsvaerd, Denmark"),
            ),
        make_record(
            "103",
            "Continuous glucose monitoring in adolescents",
            &[
                ("Eve Adams", "School of Public Health, University of Michigan"),
                ("Frank Lee", "Pfizer Inc. and Stanford University School of Medicine"),
            ],
        ),
        make_record(
            "104",
            "Machine learning for retinopathy screening",
            &[
                ("Grace Kim", "Verily Life Sciences LLC, South San Francisco"),
                ("Hiro Tanaka", "Genentech Inc., South San Francisco"),
            ],
        ),
        make_record(
            "105",
            "Dietary interventions and HbA1c",
            &[("Ivan Petrov", "Karolinska Institute, Stockholm")],
        ),
    ]
}

#[tokio::test]
async fn test_end_to_end_with_stub_source() {
    let source = MockSource::with_records(diabetes_records());
    let query = SearchQuery::new("diabetes research").max_results(5);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("papers.csv");

    let report = run(&source, &query, &Destination::Csv(path.clone()), "; ")
        .await
        .unwrap();

    assert_eq!(source.queries(), vec![query]);
    assert_eq!(report.records.len(), 5);
    assert_eq!(report.with_company_authors().count(), 2);

    let rows = read_csv(&path).unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    let expected: Vec<String> = diabetes_records().into_iter().map(|r| r.title).collect();
    assert_eq!(titles, expected);

    let with_companies: Vec<_> = rows
        .iter()
        .filter(|r| !r.company_affiliations.is_empty())
        .collect();
    assert_eq!(with_companies.len(), 2);

    assert_eq!(with_companies[0].pubmed_id, "102");
    assert_eq!(with_companies[0].non_academic_authors, "Carla Diaz; Dan Wu");
    assert_eq!(
        with_companies[0].company_affiliations,
        "Novo Nordisk Pharma Ltd, Bagsvaerd, Denmark"
    );
    assert_eq!(with_companies[0].corresponding_email, "cdiaz@novo.example");

    assert_eq!(with_companies[1].pubmed_id, "104");
    assert_eq!(
        with_companies[1].company_affiliations,
        "Verily Life Sciences LLC, South San Francisco; Genentech Inc., South San Francisco"
    );
}

#[tokio::test]
async fn test_result_count_is_respected() {
    let source = MockSource::with_records(diabetes_records());
    let report = fetch_and_classify(&source, &SearchQuery::new("diabetes").max_results(2))
        .await
        .unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].pubmed_id, "101");
}

#[tokio::test]
async fn test_no_results_is_not_an_error() {
    let source = MockSource::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");

    let report = run(
        &source,
        &SearchQuery::new("zzzz"),
        &Destination::Csv(path.clone()),
        "; ",
    )
    .await
    .unwrap();

    assert!(report.records.is_empty());
    assert!(read_csv(&path).unwrap().is_empty());
}

#[tokio::test]
async fn test_retrieval_failure_aborts_run() {
    let source = MockSource::with_records(diabetes_records());
    source.fail_with("503 Service Unavailable");

    let result = run(
        &source,
        &SearchQuery::new("diabetes"),
        &Destination::Console(ConsoleFormat::Plain),
        "; ",
    )
    .await;

    assert!(matches!(result, Err(PipelineError::Retrieval(_))));
}

#[tokio::test]
async fn test_malformed_records_are_skipped() {
    let source = MockSource::new();
    source.set_batch(FetchBatch {
        records: diabetes_records(),
        malformed: vec![papers_fetcher::models::MalformedRecord::new(
            Some("999".to_string()),
            "missing ArticleTitle",
        )],
    });

    let report = fetch_and_classify(&source, &SearchQuery::new("diabetes"))
        .await
        .unwrap();

    assert_eq!(report.records.len(), 5);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].pubmed_id.as_deref(), Some("999"));
}

const ESEARCH_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<eSearchResult><Count>2</Count><RetMax>2</RetMax><RetStart>0</RetStart>
<IdList><Id>111</Id><Id>222</Id></IdList>
</eSearchResult>"#;

const EFETCH_XML: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">111</PMID>
      <Article PubModel="Print">
        <Journal><JournalIssue><PubDate><Year>2024</Year></PubDate></JournalIssue></Journal>
        <ArticleTitle>Tirzepatide in obesity.</ArticleTitle>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Miller</LastName>
            <ForeName>Sam</ForeName>
            <AffiliationInfo><Affiliation>Eli Lilly and Company, Indianapolis, IN. Electronic address: smiller@lilly.example.com.</Affiliation></AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Rossi</LastName>
            <ForeName>Marta</ForeName>
            <AffiliationInfo><Affiliation>University of Padua, Italy.</Affiliation></AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">222</PMID>
      <Article PubModel="Print">
        <Journal><JournalIssue><PubDate><Year>2022</Year></PubDate></JournalIssue></Journal>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

fn local_pubmed(base_url: String) -> PubMedSource {
    let config = PubMedConfig {
        base_url,
        api_key: None,
        ..Default::default()
    };
    PubMedSource::new(config).unwrap()
}

#[tokio::test]
async fn test_pubmed_source_against_mock_server() {
    let mut server = mockito::Server::new_async().await;
    let esearch = server
        .mock("GET", "/esearch.fcgi")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("term".into(), "obesity drugs".into()),
            mockito::Matcher::UrlEncoded("retmax".into(), "2".into()),
        ]))
        .with_body(ESEARCH_XML)
        .create_async()
        .await;
    let efetch = server
        .mock("GET", "/efetch.fcgi")
        .match_query(mockito::Matcher::UrlEncoded("id".into(), "111,222".into()))
        .with_body(EFETCH_XML)
        .create_async()
        .await;

    let source = local_pubmed(server.url());
    assert_eq!(source.id(), "pubmed");

    let report = fetch_and_classify(&source, &SearchQuery::new("obesity drugs").max_results(2))
        .await
        .unwrap();

    esearch.assert_async().await;
    efetch.assert_async().await;

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].pubmed_id.as_deref(), Some("222"));

    let record = &report.records[0];
    assert_eq!(record.title, "Tirzepatide in obesity.");
    assert_eq!(record.publication_date, "2024");
    assert_eq!(record.non_academic_authors, vec!["Sam Miller"]);
    assert_eq!(record.company_affiliations.len(), 1);
    assert_eq!(
        record.corresponding_email.as_deref(),
        Some("smiller@lilly.example.com")
    );
}

const EFETCH_MARKUP_XML: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">333</PMID>
      <Article PubModel="Print">
        <Journal><JournalIssue><PubDate><Year>2024</Year></PubDate></JournalIssue></Journal>
        <ArticleTitle>GLP-1 signalling and Ca<sup>2+</sup> flux in <i>Mus musculus</i>.</ArticleTitle>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Ito</LastName>
            <ForeName>Ken</ForeName>
            <AffiliationInfo><Affiliation><i>Astellas</i> Pharma Inc., Tokyo, Japan. Electronic address: k.ito@astellas.example.com.</Affiliation></AffiliationInfo>
            <AffiliationInfo><Affiliation>Graduate School of Medicine, Kyoto University, Japan.</Affiliation></AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedBookArticle>
    <BookDocument><PMID Version="1">20301295</PMID><ArticleTitle>Obesity</ArticleTitle></BookDocument>
  </PubmedBookArticle>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">444</PMID>
      <Article PubModel="Print">
        <Journal><JournalIssue><PubDate><MedlineDate>2021 Spring</MedlineDate></PubDate></JournalIssue></Journal>
        <ArticleTitle>Adipose tissue in <i>ob/ob</i> mice.</ArticleTitle>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

#[tokio::test]
async fn test_pubmed_source_handles_real_world_markup() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/esearch.fcgi")
        .match_query(mockito::Matcher::Any)
        .with_body(
            "<eSearchResult><Count>3</Count><IdList><Id>333</Id><Id>20301295</Id><Id>444</Id></IdList></eSearchResult>",
        )
        .create_async()
        .await;
    server
        .mock("GET", "/efetch.fcgi")
        .match_query(mockito::Matcher::UrlEncoded("id".into(), "333,20301295,444".into()))
        .with_body(EFETCH_MARKUP_XML)
        .create_async()
        .await;

    let source = local_pubmed(server.url());
    let report = fetch_and_classify(&source, &SearchQuery::new("glp-1 obesity").max_results(3))
        .await
        .unwrap();

    assert!(report.skipped.is_empty());
    let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "GLP-1 signalling and Ca2+ flux in Mus musculus.",
            "Adipose tissue in ob/ob mice."
        ]
    );

    let first = &report.records[0];
    assert_eq!(first.non_academic_authors, vec!["Ken Ito"]);
    assert_eq!(
        first.company_affiliations,
        vec!["Astellas Pharma Inc., Tokyo, Japan. Electronic address: k.ito@astellas.example.com."]
    );
    assert_eq!(first.corresponding_email.as_deref(), Some("k.ito@astellas.example.com"));
    assert_eq!(report.records[1].publication_date, "2021 Spring");
}

#[tokio::test]
async fn test_pubmed_empty_search_skips_fetch() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/esearch.fcgi")
        .match_query(mockito::Matcher::Any)
        .with_body("<eSearchResult><Count>0</Count><IdList></IdList></eSearchResult>")
        .create_async()
        .await;
    let efetch = server
        .mock("GET", "/efetch.fcgi")
        .match_query(mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let source = local_pubmed(server.url());
    let batch = source.fetch(&SearchQuery::new("nothing matches")).await.unwrap();

    assert!(batch.is_empty());
    efetch.assert_async().await;
}

#[tokio::test]
async fn test_pubmed_http_error_is_retrieval_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/esearch.fcgi")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let source = local_pubmed(server.url());
    let err = source.fetch(&SearchQuery::new("cancer")).await.unwrap_err();

    assert!(matches!(err, SourceError::Api(_)));
}

#[tokio::test]
async fn test_pubmed_rejects_zero_results() {
    let source = local_pubmed("http://127.0.0.1:9".to_string());
    let err = source
        .fetch(&SearchQuery::new("cancer").max_results(0))
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::InvalidRequest(_)));
}
