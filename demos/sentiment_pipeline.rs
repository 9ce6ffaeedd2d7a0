//! Walk through the pipeline on a handful of tweets
//!
//! Run with: cargo run --example sentiment_pipeline

use anyhow::Result;
use tweet_sentiment::{
    classifier::SentimentClassifier,
    config::{ClassifierConfig, VectorizerConfig},
    data::train_test_split,
    metrics::Evaluator,
    nlp::Tokenizer,
    LexiconScorer, Polarity, Record,
};

fn main() -> Result<()> {
    println!("=== Tweet Sentiment Pipeline ===\n");

    let tweets = [
        ("I love this new phone, AMAZING camera!!", Polarity::Positive),
        ("Great game last night :)", Polarity::Positive),
        ("so happy the weekend is here", Polarity::Positive),
        ("thanks for the awesome support @help", Polarity::Positive),
        ("I hate waiting in line", Polarity::Negative),
        ("worst flight ever, lost my bag", Polarity::Negative),
        ("not good, not good at all", Polarity::Negative),
        ("feeling sick and tired today :(", Polarity::Negative),
        ("The meeting is at 3pm", Polarity::Neutral),
        ("It is a table.", Polarity::Neutral),
    ];
    let records: Vec<Record> = tweets
        .iter()
        .cycle()
        .take(tweets.len() * 5)
        .map(|(text, label)| Record::new(*text, *label))
        .collect();

    // 1. Tokenization
    println!("1. TOKENIZATION");
    println!("---------------");
    let tokenizer = Tokenizer::new();
    let sample = "Check https://t.co/xyz @friend I LOVE #rustlang!!";
    println!("   {}", sample);
    println!("   -> {:?}\n", tokenizer.tokenize_to_strings(sample));

    // 2. Lexicon scoring
    println!("2. LEXICON SCORER");
    println!("-----------------");
    let scorer = LexiconScorer::new();
    for (text, _) in &tweets {
        let result = scorer.score(text);
        println!("   {:+.3} {:>8}  {}", result.compound, result.polarity.as_str(), text);
    }

    let y_true: Vec<Polarity> = records.iter().map(|r| r.label).collect();
    let y_pred: Vec<Polarity> = records.iter().map(|r| scorer.label(&r.text)).collect();
    println!("\n{}", Evaluator::evaluate(&y_true, &y_pred)?);

    // 3. Classifier
    println!("3. TF-IDF + LOGISTIC REGRESSION");
    println!("-------------------------------");
    let (train, test) = train_test_split(&records, 0.2, 42)?;
    let mut classifier =
        SentimentClassifier::new(&VectorizerConfig::default(), &ClassifierConfig::default());
    let summary = classifier.train(&train)?;
    println!(
        "   Trained on {} tweets, {} features, {} iterations\n",
        summary.n_documents, summary.n_features, summary.iterations
    );
    println!("{}", classifier.evaluate(&test)?);

    let (positive, negative) = classifier.top_terms(5)?;
    println!("   Most positive terms: {:?}", positive);
    println!("   Most negative terms: {:?}", negative);

    // 4. Side by side on new text
    println!("\n4. NEW TEXT");
    println!("-----------");
    for text in ["I love the weekend", "the line was terrible", "It is a chair."] {
        println!(
            "   {:32} lexicon: {:>8}  classifier: {:>8} (p = {:.3})",
            text,
            scorer.label(text).as_str(),
            classifier.predict(text)?.as_str(),
            classifier.predict_proba(text)?
        );
    }

    println!("\nDone.");
    Ok(())
}
