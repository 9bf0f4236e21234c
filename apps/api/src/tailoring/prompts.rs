// Prompt for the resume tailoring call.
// The JSON shape at the end of the prompt is what the normalizer looks for first.

use crate::tailoring::models::JobDescription;

/// Renders the tailoring prompt. Fields are substituted in one pass, so field
/// values are embedded verbatim even if they contain brace placeholders.
///
/// Literal braces in the template are doubled for `format!`.
pub fn tailor_prompt(jd: &JobDescription) -> String {
    format!(
        r#"Analyze this resume image and the job description below. Provide specific, actionable suggestions to tailor the resume for this job.

Job Title: {title}
Company: {company}
Job Description: {description}
Requirements: {requirements}

Please provide:
1. Specific suggestions for how to modify the resume to better match this job
2. Keywords from the job description that should be incorporated
3. Skills that should be highlighted or emphasized
4. A revised summary or objective statement that aligns with this position

Format your response as JSON with the following structure:
{{
  "suggestions": ["suggestion 1", "suggestion 2", ...],
  "keywordsToAdd": ["keyword1", "keyword2", ...],
  "skillsToHighlight": ["skill1", "skill2", ...],
  "updatedContent": "A detailed explanation of how to restructure the resume content"
}}"#,
        title = jd.title,
        company = jd.company,
        description = jd.description,
        requirements = jd.requirements,
    )
}
