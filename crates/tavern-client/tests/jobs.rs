mod common;

use tavern_client::api::{CreateJobRequest, UpdateJobRequest};
use tavern_client::models::{Cadence, Job};
use tavern_client::{ClientError, JobRef};

use common::{Backend, character, prompt, spawn_backend};

async fn seeded() -> anyhow::Result<Backend> {
    let backend = spawn_backend().await?;
    backend.client.characters().create(character("Jane Doe")).await?;
    backend.client.prompts().create(prompt("Morning Greeting")).await?;
    Ok(backend)
}

fn job_request() -> CreateJobRequest {
    CreateJobRequest {
        characters: vec!["Jane Doe".into()],
        prompts: vec!["Morning Greeting".into()],
        cadence: Cadence::new("0 9 * * 1-5"),
        prompt_override: None,
    }
}

#[tokio::test]
async fn test_both_addressing_modes_reach_same_job() -> anyhow::Result<()> {
    let backend = seeded().await?;
    let jobs = backend.client.jobs();

    let created = jobs.create(job_request()).await?;
    let id = created.id.expect("backend issues an id");

    let by_id = JobRef::ById(id);
    let legacy = JobRef::legacy("Jane Doe", "Morning Greeting");
    assert_eq!(jobs.get(&by_id).await?, created);
    assert_eq!(jobs.get(&legacy).await?, created);
    assert_eq!(JobRef::for_job(&created), Some(by_id.clone()));

    let mut replacement = UpdateJobRequest::from(created.clone());
    replacement.cadence = Cadence::new("30 18 * * 0,6");
    let updated = jobs.update(&legacy, replacement).await?;
    assert_eq!(updated.id, Some(id));
    assert_eq!(jobs.get(&by_id).await?.cadence.as_str(), "30 18 * * 0,6");

    jobs.delete(&legacy).await?;
    assert!(jobs.get(&by_id).await.unwrap_err().is_not_found());
    assert!(jobs.list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_legacy_only_job() -> anyhow::Result<()> {
    let backend = seeded().await?;
    let state = backend.state.clone();
    tokio::task::spawn_blocking(move || {
        state.db.insert_job(Job {
            id: None,
            characters: vec!["Jane Doe".into()],
            prompts: vec!["Morning Greeting".into()],
            cadence: Cadence::new("0 9 * * *"),
            prompt_override: None,
        })
    })
    .await??;

    let jobs = backend.client.jobs();
    let listed = jobs.list().await?;
    assert_eq!(listed.len(), 1);
    let reference = JobRef::for_job(&listed[0]).expect("addressable");
    assert_eq!(reference, JobRef::legacy("Jane Doe", "Morning Greeting"));

    let message = jobs.run(&reference).await?;
    assert_eq!(message.text, ["Good morning!", "Lovely day."]);
    Ok(())
}

#[tokio::test]
async fn test_run_by_ref_saves_to_archive() -> anyhow::Result<()> {
    let backend = seeded().await?;
    let created = backend.client.jobs().create(job_request()).await?;
    let reference = JobRef::for_job(&created).expect("addressable");

    for _ in 0..2 {
        let message = backend.client.jobs().run(&reference).await?;
        assert_eq!(message.read, Some(false));
        assert!(message.audio.is_empty());
    }

    let chat = backend.client.chats().get("Jane Doe").await?;
    assert_eq!(chat.character, "Jane Doe");
    assert_eq!(chat.messages.len(), 2);
    assert_eq!(chat.messages[1].joined_text(), "Good morning! Lovely day.");
    Ok(())
}

#[tokio::test]
async fn test_run_unsaved_leaves_archive_alone() -> anyhow::Result<()> {
    let backend = seeded().await?;
    let jobs = backend.client.jobs();
    let job = Job {
        id: None,
        characters: vec!["Jane Doe".into()],
        prompts: vec!["Morning Greeting".into()],
        cadence: Cadence::new("once"),
        prompt_override: Some("Say hi".into()),
    };

    let message = jobs.run_unsaved(&job, false).await?;
    assert_eq!(message.text, ["Good morning!", "Lovely day."]);
    assert!(backend.client.chats().get("Jane Doe").await.unwrap_err().is_not_found());
    assert!(backend.client.chats().list_names().await?.is_empty());

    jobs.run_unsaved(&job, true).await?;
    assert_eq!(backend.client.chats().get("Jane Doe").await?.messages.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_run_missing_job_is_not_found() -> anyhow::Result<()> {
    let backend = seeded().await?;
    let err = backend
        .client
        .jobs()
        .run(&JobRef::legacy("Nobody", "Nothing"))
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
    Ok(())
}

#[tokio::test]
async fn test_run_unsaved_rejects_empty_job() -> anyhow::Result<()> {
    let backend = seeded().await?;
    let job = Job {
        id: None,
        characters: vec![],
        prompts: vec!["Morning Greeting".into()],
        cadence: Cadence::new("once"),
        prompt_override: None,
    };
    let err = backend.client.jobs().run_unsaved(&job, false).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { status: 400, .. }), "unexpected error: {err}");
    Ok(())
}

#[tokio::test]
async fn test_test_endpoints_default_to_unsaved() -> anyhow::Result<()> {
    let backend = seeded().await?;
    let jobs = backend.client.jobs();

    let stored_prompt = backend.client.prompts().get("Morning Greeting").await?;
    let message = jobs.test_prompt(&stored_prompt, "Jane Doe", false).await?;
    assert_eq!(message.text.len(), 2);

    let stored_character = backend.client.characters().get("Jane Doe").await?;
    jobs.test_character(&stored_character, "Morning Greeting", false).await?;
    assert!(backend.client.chats().list_names().await?.is_empty());

    jobs.test_character(&stored_character, "Morning Greeting", true).await?;
    assert_eq!(backend.client.chats().list_names().await?, ["Jane Doe"]);

    let err = jobs.test_prompt(&stored_prompt, "Nobody", false).await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
    Ok(())
}
